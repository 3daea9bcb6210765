mod registry;

pub use registry::{all_commands, matching_commands, CommandInvocation};

use crate::core::message::{Message, MessageRole};
use crate::core::persona::{parse_multiplier, Persona};
use crate::core::session::{SessionOrchestrator, SubmitOutcome};
use crate::core::transport::Transport;
use crate::utils::logging::LoggingState;
use tracing::warn;

/// Orchestrator driving the interactive front ends.
pub type ChatSession = SessionOrchestrator<Box<dyn Transport>>;

/// Everything a slash command may read or change.
pub struct ChatContext {
    pub session: ChatSession,
    pub logging: LoggingState,
}

impl ChatContext {
    pub fn new(session: ChatSession, logging: LoggingState) -> Self {
        Self { session, logging }
    }

    /// Submit `text` as the active persona and copy whatever the submission
    /// appended into the transcript log.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let before = self.session.log_len(self.session.active_persona());
        let outcome = self.session.submit(text).await;

        if let SubmitOutcome::Settled { persona, .. } = outcome {
            for message in self.session.log(persona).iter().skip(before) {
                if let Err(err) = self.logging.log_message(persona, message) {
                    warn!("Failed to write transcript: {err}");
                }
            }
        }
        outcome
    }

    /// The most recent assistant message for `persona`, if any.
    pub fn last_reply(&self, persona: Persona) -> Option<Message> {
        self.session
            .log(persona)
            .into_iter()
            .rev()
            .find(|message| message.role.is_assistant())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Text to show the user; the input was handled.
    Output(String),
    /// Not a command; send it to the active persona.
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(ctx: &mut ChatContext, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(ctx, invocation)
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

fn help_text(commands: &[&registry::Command]) -> String {
    let mut help = String::from("Commands:");
    for command in commands {
        for usage in command.usages {
            help.push_str(&format!("\n  {:<20} {}", usage.syntax, usage.description));
        }
    }
    help.push_str("\nAnything else is sent to the active persona.");
    help
}

pub(super) fn handle_help(_ctx: &mut ChatContext, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let commands: Vec<_> = all_commands().iter().collect();
        return CommandResult::Output(help_text(&commands));
    }

    let matches = matching_commands(invocation.args);
    if matches.is_empty() {
        CommandResult::Output(format!("No command matches '/{}'.", invocation.args))
    } else {
        CommandResult::Output(help_text(&matches))
    }
}

fn persona_line(ctx: &ChatContext, persona: Persona) -> String {
    let marker = if persona == ctx.session.active_persona() {
        '*'
    } else {
        ' '
    };
    format!(
        "{marker} {:<6} {:<22} {} (params: {}, {} messages)",
        persona.id(),
        persona.display_name(),
        persona.role(),
        persona.parameter_summary(),
        ctx.session.log_len(persona)
    )
}

pub(super) fn handle_persona(ctx: &mut ChatContext, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let lines: Vec<String> = Persona::ALL
            .iter()
            .map(|persona| persona_line(ctx, *persona))
            .collect();
        return CommandResult::Output(lines.join("\n"));
    }

    match invocation.args.parse::<Persona>() {
        Ok(persona) if persona == ctx.session.active_persona() => CommandResult::Output(format!(
            "Already chatting as {}.",
            persona.display_name()
        )),
        Ok(persona) => {
            ctx.session.set_active_persona(persona);
            CommandResult::Output(format!(
                "Now chatting as {} ({}). Parameters: {}.",
                persona.display_name(),
                persona.id(),
                persona.parameter_summary()
            ))
        }
        Err(err) => CommandResult::Output(err.to_string()),
    }
}

fn unused_note(ctx: &ChatContext, accepted: fn(Persona) -> bool) -> String {
    let persona = ctx.session.active_persona();
    if accepted(persona) {
        String::new()
    } else {
        format!(" ({} does not send it.)", persona.display_name())
    }
}

pub(super) fn handle_merchant(ctx: &mut ChatContext, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.args {
        "" => {
            let current = ctx
                .session
                .params()
                .merchant_id
                .unwrap_or_else(|| "(none)".to_string());
            CommandResult::Output(format!(
                "Merchant id: {current}{}",
                unused_note(ctx, Persona::accepts_merchant_id)
            ))
        }
        args if args.eq_ignore_ascii_case("clear") => {
            ctx.session.set_merchant_id(None);
            CommandResult::Output("Merchant id cleared.".to_string())
        }
        args => {
            ctx.session.set_merchant_id(Some(args.to_string()));
            CommandResult::Output(format!(
                "Merchant id set to {args}.{}",
                unused_note(ctx, Persona::accepts_merchant_id)
            ))
        }
    }
}

pub(super) fn handle_scale(ctx: &mut ChatContext, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Output(format!(
            "Usage: /scale <n> (current: {}x)",
            ctx.session.params().multiplier
        ));
    }

    match parse_multiplier(invocation.args) {
        Ok(multiplier) => {
            ctx.session.set_multiplier(multiplier);
            CommandResult::Output(format!(
                "Scale multiplier set to {multiplier}x.{}",
                unused_note(ctx, Persona::accepts_multiplier)
            ))
        }
        Err(err) => CommandResult::Output(err.to_string()),
    }
}

pub fn format_message(persona: Persona, message: &Message) -> String {
    let speaker = match message.role {
        MessageRole::User => "you".to_string(),
        MessageRole::Assistant => persona.display_name().to_string(),
    };
    let mut line = format!(
        "[{}] {speaker}: {}",
        message.timestamp.format("%H:%M:%S"),
        message.content
    );
    if let Some(action) = &message.action {
        line.push_str(&format!(" [{action}]"));
    }
    line
}

pub(super) fn handle_history(ctx: &mut ChatContext, invocation: CommandInvocation<'_>) -> CommandResult {
    let persona = if invocation.args.is_empty() {
        ctx.session.active_persona()
    } else {
        match invocation.args.parse::<Persona>() {
            Ok(persona) => persona,
            Err(err) => return CommandResult::Output(err.to_string()),
        }
    };

    let messages = ctx.session.log(persona);
    if messages.is_empty() {
        return CommandResult::Output(format!(
            "No messages yet with {}.",
            persona.display_name()
        ));
    }

    let lines: Vec<String> = messages
        .iter()
        .map(|message| format_message(persona, message))
        .collect();
    CommandResult::Output(lines.join("\n"))
}

pub(super) fn handle_session(ctx: &mut ChatContext, _invocation: CommandInvocation<'_>) -> CommandResult {
    let lines: Vec<String> = Persona::ALL
        .iter()
        .map(|persona| {
            let token = ctx
                .session
                .session_token(*persona)
                .unwrap_or_else(|| "(none)".to_string());
            format!("{:<6} {token}", persona.id())
        })
        .collect();
    CommandResult::Output(lines.join("\n"))
}

pub(super) fn handle_log(ctx: &mut ChatContext, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return match ctx.logging.toggle_logging() {
            Ok(message) => CommandResult::Output(message),
            Err(e) => CommandResult::Output(format!("Log error: {e}")),
        };
    }

    match ctx.logging.set_log_file(invocation.args.to_string()) {
        Ok(message) => CommandResult::Output(message),
        Err(e) => CommandResult::Output(format!("Logfile error: {e}")),
    }
}

pub(super) fn handle_quit(_ctx: &mut ChatContext, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
