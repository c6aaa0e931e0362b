use std::future::Future;
use std::pin::Pin;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::ctrl_c;
use tracing::{error, info};
use door_panels::errors::DoorPanelResult;
use door_panels::init;
use door_panels::models::{GripSizeCategory, StatusMessage};
use door_panels::state_management::PanelHandle;

type QueuedReply = Pin<Box<dyn Future<Output = DoorPanelResult<StatusMessage>> + Send>>;

const HELP: &str = "Commands: login <user> <password> | size <small|medium|large> | brake | table | storage | stop | finish | status | orders [n] | logout | quit";

/// The main entry point of the door panel controller
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

/// The core logic of the door panel controller
///
/// 1. Loads settings, initializes logging, opens the database and seeds accounts
/// 2. Spawns the panel command processor that owns the control panel
/// 3. Reads operator commands from stdin until `quit`, end of input or Ctrl-C
async fn run() -> Result<()> {
    let init::AppContext { settings, panel, processor, log_guard: _log_guard, .. } = init::initialize().await?;
    info!("Door panel controller ready (robot at {})", settings.robot.host);

    let processor = tokio::spawn(async move {
        if let Err(e) = processor.run().await {
            error!("Panel command processor error: {:?}", e);
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_line(&panel, line.trim()).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = ctrl_c() => {
                info!("Received shutdown signal. Shutting down gracefully...");
                break;
            }
        }
    }

    drop(panel);
    if let Err(e) = processor.await {
        error!("Panel command processor task failed: {}", e);
    }
    Ok(())
}

/// Handles one console line. Returns `false` when the operator asked to quit.
async fn handle_line(panel: &PanelHandle, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };

    match command.to_ascii_lowercase().as_str() {
        "quit" | "exit" => return false,
        "help" => println!("{}", HELP),
        "stop" => println!("{}", panel.stop().await),
        "status" => match panel.snapshot().await {
            Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("{}", StatusMessage::Error(e.to_string())),
            },
            Err(e) => println!("{}", StatusMessage::Error(e.to_string())),
        },
        "orders" => {
            let limit = parts.next().and_then(|n| n.parse().ok()).unwrap_or(10);
            match panel.recent_orders(limit).await {
                Ok(orders) => {
                    for order in orders {
                        let finished = order.finished_at
                            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "#{} {} {} started {} finished {}",
                            order.id, order.username, order.door_size,
                            order.started_at.format("%Y-%m-%d %H:%M:%S"), finished
                        );
                    }
                }
                Err(e) => println!("{}", StatusMessage::Error(e.to_string())),
            }
        }
        other => {
            if panel.is_busy() {
                println!("Status: Busy, previous command still in progress.");
                return true;
            }
            let args: Vec<&str> = parts.collect();
            let Some(reply) = queued_command(panel, other, &args) else {
                println!("Unknown command '{}'. {}", other, HELP);
                return true;
            };
            // Already counted as busy; the reply is printed in the background so `stop` never waits on it
            tokio::spawn(async move {
                match reply.await {
                    Ok(status) => println!("{}", status),
                    Err(e) => println!("{}", StatusMessage::Error(e.to_string())),
                }
            });
        }
    }
    true
}

/// Enqueues an action command. The request counts as busy from this call on, before the reply is awaited.
fn queued_command(panel: &PanelHandle, command: &str, args: &[&str]) -> Option<QueuedReply> {
    let arg = |i: usize| args.get(i).copied().unwrap_or("");
    let reply: QueuedReply = match command {
        "login" => Box::pin(panel.login(arg(0), arg(1))),
        "size" => Box::pin(panel.select_size(GripSizeCategory::parse(arg(0)))),
        "brake" => Box::pin(panel.brake_release()),
        "table" => Box::pin(panel.move_to_work_table()),
        "storage" => Box::pin(panel.move_to_storage()),
        "finish" => Box::pin(panel.finish_order()),
        "logout" => Box::pin(panel.logout()),
        _ => return None,
    };
    Some(reply)
}
