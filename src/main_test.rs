use clap::CommandFactory;

use super::*;

fn env_of(id: &str) -> Option<String> {
    Cli::command()
        .get_arguments()
        .find(|arg| arg.get_id() == id)
        .and_then(|arg| arg.get_env())
        .map(|env| env.to_string_lossy().into_owned())
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn connection_flags_fall_back_to_env() {
    assert_eq!(env_of("base_url").as_deref(), Some("OPENMRS_BASE_URL"));
    assert_eq!(env_of("default_locale").as_deref(), Some("OPENMRS_DEFAULT_LOCALE"));
}

#[test]
fn explicit_flags_parse() {
    let cli = Cli::try_parse_from(["form-builder", "--base-url", "http://emr", "forms"]).unwrap();
    assert_eq!(cli.base_url.as_deref(), Some("http://emr"));
    assert!(matches!(cli.command, Command::Forms));
}
