//! One-shot "say" command

use crate::commands::ChatContext;
use crate::core::session::{RejectReason, SubmitOutcome};
use std::error::Error;

pub async fn run_say(ctx: ChatContext, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");

    match ctx.submit(&prompt).await {
        SubmitOutcome::Rejected(RejectReason::Empty) => {
            eprintln!("Usage: switchboard say <prompt>");
            std::process::exit(1);
        }
        SubmitOutcome::Rejected(RejectReason::Busy) => {
            eprintln!("❌ Another message is already being sent");
            std::process::exit(1);
        }
        SubmitOutcome::Settled { persona, succeeded } => {
            let reply = ctx
                .last_reply(persona)
                .ok_or("no reply was recorded for the message")?;
            if succeeded {
                println!("{}", reply.content);
                Ok(())
            } else {
                eprintln!("❌ {}", reply.content);
                std::process::exit(1);
            }
        }
    }
}
