//! vorder application binary - composition root.
//!
//! Ties together all vorder crates into a single interactive executable:
//! 1. Load configuration from TOML, apply CLI overrides
//! 2. Build the HTTP order service client
//! 3. Build the capture controller over a file-backed audio device
//! 4. Drive the record -> draft -> edit -> confirm workflow from a
//!    line-oriented prompt, surfacing feedback through the notification
//!    center

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use vorder_capture::{CaptureController, FileAudioDevice};
use vorder_client::HttpOrderService;
use vorder_core::config::VorderConfig;
use vorder_core::types::DraftOrder;
use vorder_notify::{NotificationCenter, ToastKind};
use vorder_workflow::{ConfirmOutcome, DraftOutcome, OrderWorkflow, WorkflowError};

use cli::CliArgs;

/// Size of the chunks the file device feeds into a recording session.
const AUDIO_CHUNK_BYTES: usize = 4096;

fn print_help() {
    println!("Commands:");
    println!("  record            start recording");
    println!("  stop              stop recording and generate a draft");
    println!("  cancel            abandon the current recording");
    println!("  show              print the current draft");
    println!("  set <id> <qty>    set the quantity of a line item (0 removes it)");
    println!("  rm <id>           remove a line item");
    println!("  confirm           submit the current draft");
    println!("  discard           drop the current draft");
    println!("  help              show this help");
    println!("  quit              exit");
}

fn render_draft(order: &DraftOrder) {
    println!("Draft ({}):", order.transaction_type);
    println!("  transcript: {:?}", order.transcript);
    for item in &order.items {
        println!(
            "  #{:<6} {:<24} x{:<4} @ {:>10.2} = {:>12.2}",
            item.product_id,
            item.name,
            item.quantity,
            item.unit_price,
            item.line_total()
        );
    }
    println!("  total: {:.2}", order.total);
}

/// Print and drain everything the notification center has pending.
fn flush_notifications(center: &NotificationCenter) {
    let now = chrono::Utc::now();
    center.sweep(now);
    for toast in center.active(now) {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        };
        println!("[{}] {}: {}", tag, toast.title, toast.message);
        center.dismiss(toast.id);
    }
    if let Some(modal) = center.current_modal() {
        println!("=== {} ===", modal.title);
        println!("{}", modal.message);
        center.close_modal();
    }
}

/// Route a workflow failure to the right notification surface.
///
/// A failed submission blocks: the draft is still held and the user must
/// decide whether to confirm again or discard, so it gets the modal. Every
/// other failure is transient guidance and shows as a toast.
fn notify_workflow_error(center: &NotificationCenter, err: &WorkflowError) {
    let (title, message) = err.notice();
    if matches!(err, WorkflowError::OrderSubmissionFailed(_)) {
        center.show_modal(title, message);
    } else {
        center.error(title, message);
    }
}

async fn run_command(
    line: &str,
    controller: &CaptureController<FileAudioDevice>,
    workflow: &Arc<OrderWorkflow<HttpOrderService>>,
    center: &NotificationCenter,
) {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some(c) => c,
        None => return,
    };

    match command {
        "record" => match controller.start().await {
            Ok(session_id) => {
                center.info("Recording", format!("Session {} started", session_id));
            }
            Err(e) => {
                center.error("Cannot record", e.to_string());
            }
        },
        "stop" => match controller.stop() {
            Ok(Some(payload)) => {
                println!("Captured {} bytes, generating draft...", payload.len());
                match workflow.generate_draft(payload).await {
                    Ok(DraftOutcome::Ready(order)) => {
                        center.success("Draft ready", "Review the items, then confirm.");
                        render_draft(&order);
                    }
                    Ok(DraftOutcome::Superseded) => {
                        center.info("Discarded", "The draft was superseded by a newer attempt.");
                    }
                    Err(e) => notify_workflow_error(center, &e),
                }
            }
            Ok(None) => {
                center.info("Not recording", "Nothing to stop.");
            }
            Err(e) => {
                center.error("Cannot stop", e.to_string());
            }
        },
        "cancel" => match controller.cancel() {
            Ok(()) => {
                center.info("Cancelled", "The recording was dropped.");
            }
            Err(e) => {
                center.error("Cannot cancel", e.to_string());
            }
        },
        "show" => match workflow.current_draft() {
            Some(order) => render_draft(&order),
            None => println!("No active draft. Use `record` to start one."),
        },
        "set" => {
            let id = parts.next().and_then(|s| s.parse::<i64>().ok());
            let qty = parts.next().and_then(|s| s.parse::<i64>().ok());
            match (id, qty) {
                (Some(id), Some(qty)) => {
                    workflow.set_quantity(id, qty);
                    match workflow.current_draft() {
                        Some(order) => render_draft(&order),
                        None => println!("No active draft."),
                    }
                }
                _ => println!("Usage: set <product-id> <quantity>"),
            }
        }
        "rm" => match parts.next().and_then(|s| s.parse::<i64>().ok()) {
            Some(id) => {
                workflow.remove_item(id);
                match workflow.current_draft() {
                    Some(order) => render_draft(&order),
                    None => println!("No active draft."),
                }
            }
            None => println!("Usage: rm <product-id>"),
        },
        "confirm" => match workflow.confirm().await {
            Ok(ConfirmOutcome::Submitted(receipt)) => {
                center.success("Order placed", receipt.message.clone());
                if let Some(id) = receipt.sale_id {
                    println!("Sale id: {}", id);
                }
                if let Some(id) = receipt.purchase_id {
                    println!("Purchase id: {}", id);
                }
            }
            Ok(ConfirmOutcome::Superseded) => {
                center.info("Discarded", "The confirmation belonged to an abandoned draft.");
            }
            Err(e) => notify_workflow_error(center, &e),
        },
        "discard" | "again" => {
            if workflow.discard_draft() {
                center.info("Discarded", "The draft was dropped.");
            } else {
                println!("No active draft.");
            }
        }
        "help" => print_help(),
        other => println!("Unknown command: {} (try `help`)", other),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing.
    let default_filter = args.resolve_log_level().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("Starting vorder v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = VorderConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);
    tracing::info!(
        path = %config_file.display(),
        base_url = %config.service.base_url,
        umkm_id = config.account.umkm_id,
        "Configuration loaded"
    );

    // Service client, capture, workflow, notifications.
    let service = HttpOrderService::new(&config.service)?;
    let device = FileAudioDevice::new(&args.audio, AUDIO_CHUNK_BYTES);
    let controller = CaptureController::new(device);
    let workflow = Arc::new(OrderWorkflow::new(service, config.account.clone()));
    let center = NotificationCenter::new(Duration::from_secs(config.notify.toast_dismiss_secs));

    println!("vorder — voice order entry (audio source: {})", args.audio.display());
    print_help();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        println!();
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let line = line.trim();
        if line == "quit" || line == "exit" {
            break;
        }
        run_command(line, &controller, &workflow, &center).await;
        flush_notifications(&center);
    }

    tracing::info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> NotificationCenter {
        NotificationCenter::new(Duration::from_secs(5))
    }

    #[test]
    fn test_submission_failure_shows_modal() {
        let center = center();
        let err = WorkflowError::OrderSubmissionFailed("connection reset".to_string());
        notify_workflow_error(&center, &err);

        let modal = center.current_modal().expect("modal expected");
        assert_eq!(modal.title, "Could not place your order");
        assert_eq!(center.toast_count(), 0);
    }

    #[test]
    fn test_other_failures_show_toast() {
        let center = center();
        notify_workflow_error(&center, &WorkflowError::EmptyOrder);
        notify_workflow_error(
            &center,
            &WorkflowError::OrderProcessingFailed("timeout".to_string()),
        );

        assert_eq!(center.toast_count(), 2);
        assert!(center.current_modal().is_none());
    }
}
