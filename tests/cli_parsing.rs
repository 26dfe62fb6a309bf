use clap::Parser;
use sheetwright::cli::{Cli, Commands, ConfigCommands};

#[test]
fn test_parse_demo() {
    let cli = Cli::try_parse_from([
        "sheetwright",
        "demo",
        "Build P&L",
        "--mode",
        "analyst",
        "--approve-all",
        "--commit",
    ])
    .unwrap();

    assert!(!cli.json);
    match cli.command {
        Commands::Demo(args) => {
            assert_eq!(args.utterance, "Build P&L");
            assert_eq!(args.mode.as_deref(), Some("analyst"));
            assert!(args.approve_all);
            assert!(args.commit);
            assert!(!args.accept_plan);
        }
        Commands::Config(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_demo_defaults() {
    let cli = Cli::try_parse_from(["sheetwright", "demo", "hello"]).unwrap();
    match cli.command {
        Commands::Demo(args) => {
            assert!(args.mode.is_none());
            assert!(!args.approve_all);
        }
        Commands::Config(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_json_flag_is_global() {
    let cli = Cli::try_parse_from(["sheetwright", "config", "show", "--json"]).unwrap();
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Commands::Config(ConfigCommands::Show { file: None })
    ));
}

#[test]
fn test_config_show_with_file() {
    let cli =
        Cli::try_parse_from(["sheetwright", "config", "show", "--file", "custom.yaml"]).unwrap();
    match cli.command {
        Commands::Config(ConfigCommands::Show { file }) => {
            assert_eq!(file.unwrap().to_str(), Some("custom.yaml"));
        }
        Commands::Demo(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_demo_requires_utterance() {
    assert!(Cli::try_parse_from(["sheetwright", "demo"]).is_err());
}
