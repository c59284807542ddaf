use clap::Arg;
use clap::Command;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

fn arg_for(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    let mut help = help.to_string();
    let default = Config::default(key);
    if !default.is_empty() {
        help = format!("{help} [default: {default}]");
    }

    Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
}

/// Arguments mirrored by the config file.
pub fn config_args() -> Vec<Arg> {
    return vec![
        arg_for(
            ConfigKey::ConfigFile,
            "TALEWEAVE_CONFIG_FILE",
            "Path to the configuration file",
        )
        .short('c'),
        arg_for(
            ConfigKey::ServiceUrl,
            "TALEWEAVE_SERVICE_URL",
            "Base URL of the story workflow webhooks",
        ),
        arg_for(
            ConfigKey::Timeout,
            "TALEWEAVE_TIMEOUT",
            "Seconds to wait for each story workflow call",
        ),
    ];
}

/// Add the configuration arguments to an existing command.
pub fn augment(cmd: Command) -> Command {
    cmd.args(config_args())
}

#[cfg(test)]
pub(crate) fn build() -> Command {
    augment(
        Command::new("taleweave")
            .about("Write a story together with an AI, five panels at a time.")
            .arg_required_else_help(false),
    )
}
