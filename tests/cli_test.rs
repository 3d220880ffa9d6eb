//! CLI Command Tests
//!
//! Argument parsing, plus the listing handlers run against a mock Plex
//! server. Covers exit codes and enrichment in headless mode.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use postergrid::cli::{Cli, Command};
    use postergrid::PresentationMode;

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["postergrid", "m", "3"]);
        assert!(matches!(cli.command, Command::Movies(ref cmd) if cmd.section == "3"));

        let cli = Cli::parse_from(["postergrid", "s", "5123"]);
        assert!(matches!(cli.command, Command::Seasons(ref cmd) if cmd.show == "5123"));

        let cli = Cli::parse_from(["postergrid", "b", "1"]);
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "postergrid",
            "movies",
            "1",
            "--json",
            "-s",
            "http://nas:32400",
            "-t",
            "abc",
        ]);
        assert!(cli.json);
        assert_eq!(cli.server.as_deref(), Some("http://nas:32400"));
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_browse_seasons_grid() {
        let cli = Cli::parse_from(["postergrid", "browse", "--seasons", "77", "-g"]);
        match cli.command {
            Command::Browse(cmd) => {
                assert_eq!(cmd.seasons.as_deref(), Some("77"));
                assert!(cmd.section.is_none());
                assert_eq!(
                    cmd.presentation(PresentationMode::Gallery),
                    PresentationMode::Grid
                );
            }
            _ => panic!("Expected Browse command"),
        }
    }

    #[test]
    fn test_browse_needs_a_source() {
        assert!(Cli::try_parse_from(["postergrid", "browse"]).is_err());
        assert!(Cli::try_parse_from(["postergrid", "browse", "1", "--seasons", "7"]).is_err());
    }

    #[test]
    fn test_trailer_requires_item() {
        assert!(Cli::try_parse_from(["postergrid", "trailer"]).is_err());
    }
}

// =============================================================================
// Command Handler Tests
// =============================================================================

mod handlers {
    use mockito::{Matcher, Server};
    use postergrid::cli::{ExitCode, MoviesCmd, Output, SeasonsCmd};
    use postergrid::commands::{movies_cmd, seasons_cmd};
    use postergrid::Config;

    fn quiet() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn config_for(url: String, dir: &tempfile::TempDir) -> Config {
        Config {
            server_url: Some(url),
            metadata_db: Some(dir.path().join("metadata.db")),
            ..Config::default()
        }
    }

    fn movies(section: &str, enrich: bool) -> MoviesCmd {
        MoviesCmd {
            section: section.into(),
            category: "all".into(),
            enrich,
        }
    }

    #[tokio::test]
    async fn test_movies_success() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        let mock = server
            .mock("GET", "/library/sections/1/all")
            .with_status(200)
            .with_body(
                r#"{"MediaContainer": {"title1": "Movies", "Metadata": [
                    {"ratingKey": "1", "type": "movie", "title": "Alien", "thumb": "/a.jpg"}
                ]}}"#,
            )
            .create_async()
            .await;

        let config = config_for(server.url(), &dir);
        let code = movies_cmd(movies("1", false), &config, &quiet()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_movies_enrich_probes_subtitles() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        server
            .mock("GET", "/library/sections/1/all")
            .with_status(200)
            .with_body(
                r#"{"MediaContainer": {"Metadata": [
                    {"ratingKey": "1", "type": "movie", "title": "Alien", "thumb": "/a.jpg"},
                    {"ratingKey": "2", "type": "movie", "title": "Heat", "thumb": "/h.jpg"}
                ]}}"#,
            )
            .create_async()
            .await;
        let details = server
            .mock("GET", Matcher::Regex(r"^/library/metadata/[12]$".into()))
            .with_status(200)
            .with_body(r#"{"MediaContainer": {"Metadata": []}}"#)
            .expect(2)
            .create_async()
            .await;

        let config = config_for(server.url(), &dir);
        let code = movies_cmd(movies("1", true), &config, &quiet()).await;

        details.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_missing_section_is_not_found() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        server
            .mock("GET", "/library/sections/9/all")
            .with_status(404)
            .create_async()
            .await;

        let config = config_for(server.url(), &dir);
        let code = movies_cmd(movies("9", false), &config, &quiet()).await;
        assert_eq!(code, ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        server
            .mock("GET", "/library/metadata/5/children")
            .with_status(500)
            .create_async()
            .await;

        let config = config_for(server.url(), &dir);
        let code = seasons_cmd(SeasonsCmd { show: "5".into() }, &config, &quiet()).await;
        assert_eq!(code, ExitCode::NetworkError);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        server
            .mock("GET", "/library/metadata/5/children")
            .with_status(200)
            .with_body(r#"{"MediaContainer": {"size": 0}}"#)
            .create_async()
            .await;

        let config = config_for(server.url(), &dir);
        let code = seasons_cmd(SeasonsCmd { show: "5".into() }, &config, &quiet()).await;
        assert_eq!(code, ExitCode::EmptyListing);
    }
}
