//! Sign-up Flow
//!
//! This example gathers sign-up details through a sequence of prompts, each
//! of which suspends the sequencer until the answer arrives.
//!
//! Key concepts:
//! - A workflow payload shared by every step
//! - Bridge actions that schedule work on a "main queue" and suspend
//! - Completion handlers that resume the sequence with a decision
//! - Reading the run log and a JSON report afterwards
//!
//! Run with: cargo run --example signup

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use stepline::bridge::{async_action, QueueDispatcher};
use stepline::{ActionError, Control, Sequencer};

#[derive(Debug, Default)]
struct SignupInformation {
    name: Option<String>,
    email_address: Option<String>,
}

#[derive(Default)]
struct GatherSignupInformation {
    details: Mutex<SignupInformation>,
}

/// Ask a question and hand the answer to `then`, like an alert with a text field.
fn prompt(text: &str, then: impl FnOnce(Option<String>)) {
    print!("{text}: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    let answer = match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()).filter(|s| !s.is_empty()),
    };
    then(answer);
}

fn main() {
    println!("=== Sign-up Flow Example ===\n");

    let main_queue = QueueDispatcher::new();
    let gather = Arc::new(GatherSignupInformation::default());

    let sequencer = Sequencer::builder()
        .label("gather signup information")
        .shared_workflow(Arc::clone(&gather))
        .action(async_action(
            "retrieve user name",
            main_queue.clone(),
            |gather: &GatherSignupInformation, sequencer| {
                let sequencer = Arc::clone(sequencer);
                prompt("Enter your name", |name| {
                    gather.details.lock().unwrap().name = name;
                    if let Err(err) = sequencer.deliver(Control::Continue) {
                        eprintln!("Could not continue: {err}");
                    }
                });
                Ok(())
            },
        ))
        .action(async_action(
            "retrieve email address",
            main_queue.clone(),
            |gather: &GatherSignupInformation, sequencer| {
                let sequencer = Arc::clone(sequencer);
                prompt("Enter your email address", |email| {
                    gather.details.lock().unwrap().email_address = email;
                    if let Err(err) = sequencer.deliver(Control::Continue) {
                        eprintln!("Could not continue: {err}");
                    }
                });
                Ok(())
            },
        ))
        .action(async_action(
            "final delivery",
            main_queue.clone(),
            |gather: &GatherSignupInformation, sequencer| {
                let details = gather.details.lock().unwrap();
                if details.name.is_none() {
                    return Err(ActionError::msg("a name is required"));
                }
                println!("\nAll done: {details:?}");
                drop(details);
                sequencer
                    .deliver(Control::Continue)
                    .map_err(ActionError::new)
            },
        ))
        .build();

    if let Err(err) = sequencer.resume(None) {
        eprintln!("Could not start: {err}");
        return;
    }

    // the host's run loop
    let handled = main_queue.run_pending();

    println!("\nEvents handled: {handled}");
    println!("Final status: {}", sequencer.status());
    if let Some(error) = sequencer.last_error() {
        println!("Last error: {error}");
    }
    for entry in sequencer.log().entries() {
        println!("  {} -> {}", entry.action, entry.signal);
    }

    match sequencer.report().to_json_pretty() {
        Ok(json) => println!("\nReport:\n{json}"),
        Err(err) => eprintln!("Could not render report: {err}"),
    }

    println!("\n=== Example Complete ===");
}
