//! Line-oriented interactive chat on stdin/stdout.

use crate::commands::{format_message, process_input, ChatContext, CommandResult};
use crate::core::session::{RejectReason, SubmitOutcome};
use std::error::Error;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

fn prompt(ctx: &ChatContext) -> io::Result<()> {
    print!("{}> ", ctx.session.active_persona().id());
    io::stdout().flush()
}

pub async fn run_chat(mut ctx: ChatContext) -> Result<(), Box<dyn Error>> {
    let persona = ctx.session.active_persona();
    println!(
        "Chatting as {} ({}). Type /help for commands, /quit to leave.",
        persona.display_name(),
        persona.role()
    );
    if ctx.logging.is_active() {
        println!("Transcript logging: {}", ctx.logging.get_status_string());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&ctx)?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match process_input(&mut ctx, &line) {
            CommandResult::Output(text) => println!("{text}"),
            CommandResult::Quit => break,
            CommandResult::ProcessAsMessage(text) => match ctx.submit(&text).await {
                SubmitOutcome::Rejected(RejectReason::Empty) => {}
                SubmitOutcome::Rejected(RejectReason::Busy) => {
                    println!("Still waiting for the previous reply.");
                }
                SubmitOutcome::Settled { persona, .. } => {
                    if let Some(reply) = ctx.last_reply(persona) {
                        println!("{}", format_message(persona, &reply));
                    }
                }
            },
        }
    }

    Ok(())
}
