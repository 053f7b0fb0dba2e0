//! Classification of scanned files into accepted, failed and excluded.
//!
//! Every file is classified independently by [`classify_file`]; nothing one
//! file does can stop another from being classified. [`classify`] resolves
//! the Steam accounts once, classifies the batch through
//! [`classify_stream`] and sorts the result.

mod file;
mod stream;

pub use self::file::classify_file;
pub use self::stream::{ClassifyEvent, classify_stream};
use crate::Context;
use crate::models::BatchResult;
use crate::scan::ScannedFile;
use futures::StreamExt;
use srm_steam::{AccountDirectory, partition_accounts};
use tracing::instrument;

/// Classifies every file in `files` and resolves the parser's accounts
/// against `accounts`.
///
/// Every file appears in exactly one of the result's partitions.
#[instrument(skip_all, fields(parser = %ctx.config.name(), files = files.len()))]
pub async fn classify(ctx: &Context, files: Vec<ScannedFile>, accounts: &dyn AccountDirectory) -> BatchResult {
    let mut batch = BatchResult::default();

    let partition = partition_accounts(accounts, &ctx.config.user_accounts.specified_accounts);
    batch.has_no_usable_accounts = ctx.config.requires_accounts() && partition.found.is_empty();
    batch.found_accounts = partition.found;
    batch.missing_accounts = partition.missing;

    let mut events = std::pin::pin!(classify_stream(ctx, files));
    while let Some(event) = events.next().await {
        if let ClassifyEvent::Classified(outcome) = event {
            batch.push(outcome);
        }
    }
    batch.sort();

    tracing::info!(
        accepted = batch.accepted.len(),
        failed = batch.failed.len(),
        excluded = batch.excluded.len(),
        "Classification complete"
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailureReason, Outcome};
    use crate::scan::scan;
    use srm_config::{ArtworkKind, Configuration, Executable, ParserType};
    use srm_steam::{ExclusionRegistry, ExclusionSet, NoAccounts, assign};
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn roms(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"").unwrap();
        }
        dir
    }

    fn config(dir: &TempDir) -> Configuration {
        Configuration {
            parser_type: ParserType::FileName,
            rom_directory: dir.path().display().to_string(),
            executable: Executable {
                path: "/usr/bin/emu".to_string(),
                append_args_to_executable: false,
            },
            executable_args: "\"${filePath}\"".to_string(),
            ..Default::default()
        }
    }

    async fn run(ctx: &Context) -> BatchResult {
        let files = scan(ctx.rom_directory(), &ctx.config.extensions).unwrap();
        classify(ctx, files, &NoAccounts).await
    }

    #[tokio::test]
    async fn partitions_are_complete_sorted_and_exclusion_wins() {
        let dir = roms(&["Tetris.gb", "zelda.gb", "Alpha.gb", "Excluded.gb", "nested/Beta.gb"]);
        let excluded = ExclusionSet::new().key("\"/usr/bin/emu\"", "Excluded", "File name");
        let ctx = Context::new(config(&dir), &BTreeMap::new())
            .unwrap()
            .with_exclusions([excluded.clone()].into_iter().collect::<ExclusionSet>())
            .with_workers(2);

        let batch = run(&ctx).await;

        assert_eq!(batch.len(), 5);
        let titles: Vec<_> = batch.accepted.iter().map(|c| c.final_title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Tetris", "zelda"]);
        assert_eq!(batch.excluded.len(), 1);
        assert_eq!(batch.excluded[0].exclusion_key, excluded);
        assert_eq!(batch.excluded[0].file_path, dir.path().join("Excluded.gb"));
        assert!(batch.failed.is_empty());
        assert!(!batch.has_no_usable_accounts);
    }

    #[tokio::test]
    async fn accepted_candidate_is_fully_populated() {
        let dir = roms(&["Pokémon (Red).gb"]);
        let mut config = config(&dir);
        config.fuzzy_match = srm_extract::FuzzyOptions::all();
        config.steam_categories = vec!["Game Boy".into(), "${missing}".into(), "Game Boy".into()];
        let ctx = Context::new(config, &BTreeMap::new()).unwrap();

        let batch = run(&ctx).await;

        let candidate = &batch.accepted[0];
        let rom = dir.path().join("Pokémon (Red).gb");
        assert_eq!(candidate.extracted_title, "Pokémon (Red)");
        assert_eq!(candidate.fuzzy_title, "Pokemon Red");
        assert_eq!(candidate.final_title, "Pokemon Red");
        assert_eq!(candidate.modified_executable_location, "\"/usr/bin/emu\"");
        assert_eq!(candidate.argument_string, format!("\"{}\"", rom.display()));
        assert_eq!(candidate.start_in_directory, "/usr/bin");
        assert_eq!(candidate.steam_categories, vec!["Game Boy"]);
        assert_eq!(candidate.image_pool, "Pokemon Red");
        assert!(candidate.online_image_queries.is_empty());
        assert_eq!(candidate.identity, assign("\"/usr/bin/emu\"", "Pokemon Red"));
        for kind in ArtworkKind::ALL {
            assert_eq!(candidate.default_image[&kind], None);
            assert!(candidate.local_images[&kind].is_empty());
            assert!(candidate.resolved_default_images[&kind].is_empty());
            assert!(candidate.resolved_local_images[&kind].is_empty());
            assert_eq!(candidate.preferred_image(kind), None);
        }
    }

    #[tokio::test]
    async fn appended_arguments_join_the_executable() {
        let dir = roms(&["Doom.wad"]);
        let mut config = config(&dir);
        config.executable.append_args_to_executable = true;
        config.executable_args = "-iwad ${fileName}".to_string();
        let ctx = Context::new(config, &BTreeMap::new()).unwrap();

        let candidate = &run(&ctx).await.accepted[0];
        assert_eq!(candidate.modified_executable_location, "\"/usr/bin/emu\" -iwad Doom.wad");
        assert_eq!(candidate.argument_string, "");
        assert_eq!(candidate.identity, assign("\"/usr/bin/emu\" -iwad Doom.wad", "Doom"));
    }

    #[tokio::test]
    async fn file_is_its_own_executable_without_executable_path() {
        let dir = roms(&["Games/Half-Life.exe"]);
        let mut config = config(&dir);
        config.executable.path = String::new();
        config.executable_args = String::new();
        let ctx = Context::new(config, &BTreeMap::new()).unwrap();

        let candidate = &run(&ctx).await.accepted[0];
        let exe = dir.path().join("Games/Half-Life.exe");
        assert_eq!(candidate.modified_executable_location, format!("\"{}\"", exe.display()));
        assert_eq!(candidate.start_in_directory, dir.path().join("Games").display().to_string());
    }

    #[tokio::test]
    async fn failures_are_reported_per_file() {
        let dir = roms(&["Tetris.gb", "sub/Nested.gb", "Kirby.gb"]);
        let mut config = config(&dir);
        config.parser_type = ParserType::Glob;
        config.parser_input = "${title}.gb".to_string();
        config.title_modifier = "${fuzzyTitle}${suffix_${title}}".to_string();
        config.title_from_variable.skip_file_if_variable_was_not_found = true;
        let variables = BTreeMap::from([("suffix_Tetris".to_string(), " DX".to_string())]);
        let ctx = Context::new(config, &variables).unwrap();

        let batch = run(&ctx).await;

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.accepted[0].final_title, "Tetris DX");
        let reasons: BTreeMap<_, _> = batch
            .failed
            .iter()
            .map(|f| (f.file_path.strip_prefix(dir.path()).unwrap().display().to_string(), f.reason.clone()))
            .collect();
        assert_eq!(reasons["Kirby.gb"], FailureReason::UnresolvedPlaceholder("suffix_Kirby".into()));
        assert_eq!(reasons["sub/Nested.gb"], FailureReason::NoTitle);
    }

    #[tokio::test]
    async fn empty_final_title_fails() {
        let dir = roms(&["Tetris.gb"]);
        let mut config = config(&dir);
        config.title_modifier = "${nothing}".to_string();
        let ctx = Context::new(config, &BTreeMap::new()).unwrap();

        let batch = run(&ctx).await;
        assert_eq!(batch.failed[0].reason, FailureReason::EmptyFinalTitle);
    }

    #[tokio::test]
    async fn title_from_custom_variable() {
        let dir = roms(&["sf2.zip", "pacman.zip", "unknown.zip"]);
        let mut config = config(&dir);
        config.title_from_variable.limit_to_groups = vec!["MAME".to_string()];
        config.title_from_variable.skip_file_if_variable_was_not_found = true;
        let custom = BTreeMap::from([(
            "MAME".to_string(),
            BTreeMap::from([
                ("sf2".to_string(), "Street Fighter II".to_string()),
                ("pacman".to_string(), "Pac-Man".to_string()),
            ]),
        )]);
        let ctx = Context::new(config, &BTreeMap::new()).unwrap().with_custom_variables(custom);

        let batch = run(&ctx).await;
        let titles: Vec<_> = batch.accepted.iter().map(|c| c.final_title.as_str()).collect();
        assert_eq!(titles, vec!["Pac-Man", "Street Fighter II"]);
        assert_eq!(batch.accepted[0].extracted_title, "pacman");
        assert_eq!(batch.failed[0].reason, FailureReason::VariableNotFound("unknown".into()));
    }

    #[tokio::test]
    async fn excluded_file_wins_over_missing_variable() {
        let dir = roms(&["unknown.zip", "stray.zip"]);
        let mut config = config(&dir);
        config.title_from_variable.limit_to_groups = vec!["MAME".to_string()];
        config.title_from_variable.skip_file_if_variable_was_not_found = true;
        let exclusions = ExclusionSet::new();
        let key = exclusions.key("\"/usr/bin/emu\"", "unknown", "File name");
        let ctx = Context::new(config, &BTreeMap::new())
            .unwrap()
            .with_exclusions([key.clone()].into_iter().collect::<ExclusionSet>());

        let batch = run(&ctx).await;
        assert!(batch.accepted.is_empty());
        assert_eq!(batch.excluded.len(), 1);
        assert_eq!(batch.excluded[0].exclusion_key, key);
        assert!(batch.excluded[0].file_path.ends_with("unknown.zip"));
        assert_eq!(batch.failed.len(), 1);
        assert_eq!(batch.failed[0].reason, FailureReason::VariableNotFound("stray".into()));
    }

    #[tokio::test]
    async fn accounts_are_required_only_with_a_steam_directory() {
        let dir = roms(&["Tetris.gb"]);
        let mut config = config(&dir);
        config.user_accounts.specified_accounts = vec!["gaben".to_string()];
        let ctx = Context::new(config.clone(), &BTreeMap::new()).unwrap();
        let batch = run(&ctx).await;
        assert!(!batch.has_no_usable_accounts);
        assert_eq!(batch.missing_accounts, vec!["gaben"]);

        config.steam_directory = "${steamDirGlobal}".to_string();
        let variables = BTreeMap::from([("steamDirGlobal".to_string(), "/opt/steam".to_string())]);
        let ctx = Context::new(config, &variables).unwrap();
        assert_eq!(ctx.steam_directory(), Some(std::path::Path::new("/opt/steam")));
        let batch = run(&ctx).await;
        assert!(batch.has_no_usable_accounts);
        assert_eq!(batch.found_accounts.len() + batch.missing_accounts.len(), 1);
    }

    #[tokio::test]
    async fn stream_events_are_ordered() {
        let dir = roms(&["a.gb", "b.gb", "c.gb"]);
        let ctx = Context::new(config(&dir), &BTreeMap::new()).unwrap().with_workers(1);
        let files = scan(ctx.rom_directory(), &[]).unwrap();

        let events: Vec<_> = classify_stream(&ctx, files).collect().await;

        assert_eq!(events.len(), 6);
        assert_eq!(events[0], ClassifyEvent::Started);
        assert_eq!(events[1], ClassifyEvent::DiscoveryComplete(3));
        assert!(events[2..5].iter().all(|e| matches!(e, ClassifyEvent::Classified(Outcome::Accepted(_)))));
        assert_eq!(events[5], ClassifyEvent::Complete);
    }
}
