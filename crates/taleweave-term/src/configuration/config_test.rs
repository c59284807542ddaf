use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use serial_test::serial;
use tempfile::NamedTempFile;

use super::*;
use crate::application::cli;

async fn load_from(args: &[&str]) -> Result<()> {
    let cmd = cli::build();
    let matches = cmd.clone().try_get_matches_from(args.to_vec())?;
    Config::load(cmd, vec![&matches]).await
}

fn config_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{contents}")?;
    Ok(file)
}

#[tokio::test]
#[serial]
async fn it_uses_defaults_without_a_config_file() -> Result<()> {
    load_from(&["taleweave", "--config-file", "/does/not/exist.toml"]).await?;

    assert_eq!(
        Config::get(ConfigKey::ServiceUrl),
        "http://localhost:5678/webhook"
    );
    assert_eq!(Config::timeout()?, Duration::from_secs(120));

    Ok(())
}

#[tokio::test]
#[serial]
async fn it_reads_the_config_file() -> Result<()> {
    let file = config_file("service-url = \"http://story.test/hooks\"\ntimeout = 30\n")?;
    let path = file.path().to_string_lossy().to_string();

    load_from(&["taleweave", "--config-file", &path]).await?;

    assert_eq!(Config::get(ConfigKey::ServiceUrl), "http://story.test/hooks");
    assert_eq!(Config::timeout()?, Duration::from_secs(30));

    Ok(())
}

#[tokio::test]
#[serial]
async fn it_prefers_arguments_over_the_config_file() -> Result<()> {
    let file = config_file("service-url = \"http://story.test/hooks\"\n")?;
    let path = file.path().to_string_lossy().to_string();

    load_from(&[
        "taleweave",
        "--config-file",
        &path,
        "--service-url",
        "http://override.test/webhook",
    ])
    .await?;

    assert_eq!(
        Config::get(ConfigKey::ServiceUrl),
        "http://override.test/webhook"
    );

    Ok(())
}

#[tokio::test]
#[serial]
async fn it_rejects_unusable_values() -> Result<()> {
    let file = config_file("service-url = true\n")?;
    let path = file.path().to_string_lossy().to_string();
    assert!(load_from(&["taleweave", "--config-file", &path]).await.is_err());

    load_from(&["taleweave", "--config-file", "/does/not/exist.toml", "--timeout", "soon"]).await?;
    assert!(Config::timeout().is_err());

    Ok(())
}

#[test]
fn it_serializes_defaults() {
    let toml_str = Config::serialize_default(cli::build());

    assert!(toml_str.contains("# Base URL of the story workflow webhooks\nservice-url = \"http://localhost:5678/webhook\""));
    assert!(toml_str.contains("timeout = 120"));
    assert!(!toml_str.contains("config-file"));
}
