use super::{ChatContext, CommandResult};

pub type CommandHandler = fn(&mut ChatContext, CommandInvocation<'_>) -> CommandResult;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usages: &'static [CommandUsage],
    pub handler: CommandHandler,
}

impl Command {
    fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands().iter().find(|command| command.answers_to(name))
}

/// Commands whose name starts with `prefix`, ignoring case.
pub fn matching_commands(prefix: &str) -> Vec<&'static Command> {
    let prefix = prefix.trim_start_matches('/').to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| command.name.starts_with(&prefix))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/help [command]",
            description: "Show available commands, or the ones matching a prefix.",
        }],
        handler: super::handle_help,
    },
    Command {
        name: "persona",
        aliases: &[],
        usages: &[
            CommandUsage {
                syntax: "/persona",
                description: "List personas and show which one is active.",
            },
            CommandUsage {
                syntax: "/persona <id>",
                description: "Switch the active persona (growth, infra, ops, dev).",
            },
        ],
        handler: super::handle_persona,
    },
    Command {
        name: "merchant",
        aliases: &[],
        usages: &[
            CommandUsage {
                syntax: "/merchant <id>",
                description: "Set the merchant id sent with growth and infra messages.",
            },
            CommandUsage {
                syntax: "/merchant clear",
                description: "Stop sending a merchant id.",
            },
        ],
        handler: super::handle_merchant,
    },
    Command {
        name: "scale",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/scale <n>",
            description: "Set the traffic multiplier sent with infra messages.",
        }],
        handler: super::handle_scale,
    },
    Command {
        name: "history",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/history [persona]",
            description: "Print the conversation with the active or named persona.",
        }],
        handler: super::handle_history,
    },
    Command {
        name: "session",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/session",
            description: "Show the backend session token held for each persona.",
        }],
        handler: super::handle_session,
    },
    Command {
        name: "log",
        aliases: &[],
        usages: &[
            CommandUsage {
                syntax: "/log <file>",
                description: "Append the transcript to a file.",
            },
            CommandUsage {
                syntax: "/log",
                description: "Pause or resume transcript logging.",
            },
        ],
        handler: super::handle_log,
    },
    Command {
        name: "quit",
        aliases: &["exit", "q"],
        usages: &[CommandUsage {
            syntax: "/quit",
            description: "Leave the chat.",
        }],
        handler: super::handle_quit,
    },
];
