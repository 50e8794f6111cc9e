// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gasearch CLI entrypoint.
//!
//! Runs one participant's search session in the terminal. Progress is kept in the session
//! directory, so quitting and restarting resumes at the same target and attempt.

use std::error::Error;
use std::path::{Path, PathBuf};

use gasearch::config::{Config, DatasetSizeFit};
use gasearch::format::DatasetFolder;
use gasearch::i18n::{Locale, Messages};
use gasearch::model::fixtures::{demo_dataset, demo_targets};
use gasearch::pages::{QueryLog, StaticPageSource};
use gasearch::store::{FileStore, SessionStore, WriteDurability};

const DEMO_TARGET_COUNT: usize = 10;
const DEMO_DATASET_SIZE: usize = 400;

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {program} [--demo | --dataset <dir>] [--session <dir> | <dir>] [--config <file>] \
         [--locale <en|cs>] [--new] [--durable-writes]\n\
         \n\
         --dataset <dir>    Folder with nounlist.txt, result.csv and optionally targets.txt\n\
         --demo             Use a small generated dataset instead\n\
         --session <dir>    Where progress, the query log and gasearch.log are kept (default: .)\n\
         --config <file>    JSON experiment settings\n\
         --locale <tag>     UI language (otherwise GASEARCH_LOCALE or LANG)\n\
         --new              Start over at the first target\n\
         --durable-writes   fsync every progress update"
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    dataset_dir: Option<String>,
    session_dir: Option<String>,
    config_path: Option<String>,
    locale: Option<Locale>,
    reset: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--dataset" => {
                if options.dataset_dir.is_some() {
                    return Err(());
                }
                options.dataset_dir = Some(args.next().ok_or(())?);
            }
            "--session" => {
                if options.session_dir.is_some() {
                    return Err(());
                }
                options.session_dir = Some(args.next().ok_or(())?);
            }
            "--config" => {
                if options.config_path.is_some() {
                    return Err(());
                }
                options.config_path = Some(args.next().ok_or(())?);
            }
            "--locale" => {
                if options.locale.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.locale = Some(raw.parse().map_err(|_| ())?);
            }
            "--new" | "--reset" => {
                if options.reset {
                    return Err(());
                }
                options.reset = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.session_dir.is_some() {
                    return Err(());
                }
                options.session_dir = Some(arg);
            }
        }
    }

    if options.demo && options.dataset_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

/// Milliseconds since the epoch plus the process id; names this run in the query log.
fn run_id() -> String {
    let now_millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{now_millis}-{}", std::process::id())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "gasearch".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let session_dir = PathBuf::from(options.session_dir.as_deref().unwrap_or("."));
        if let Err(err) = gasearch::logging::init(&session_dir) {
            eprintln!("gasearch: logging disabled: {err}");
        }

        let mut config = match options.config_path.as_deref() {
            Some(path) => Config::load(Path::new(path))?,
            None => Config::default(),
        };
        let locale = Locale::from_env(options.locale.or(config.locale));
        let messages = Messages::new(locale);
        log::info!("locale {locale}");

        let (dataset, targets) = match options.dataset_dir.as_deref() {
            Some(dir) => {
                let folder = DatasetFolder::new(dir);
                let dataset = folder.load_dataset()?;
                let targets = match folder.load_targets()? {
                    Some(targets) => targets,
                    None => demo_targets(dataset.id_bound(), DEMO_TARGET_COUNT),
                };
                (dataset, targets)
            }
            None => {
                let dataset = demo_dataset(DEMO_DATASET_SIZE);
                let targets = demo_targets(dataset.len(), DEMO_TARGET_COUNT);
                (dataset, targets)
            }
        };
        match config.fit_dataset_size(dataset.id_bound()) {
            DatasetSizeFit::Kept => {}
            DatasetSizeFit::Raised { configured } => log::warn!(
                "dataset_size {configured} hides classified images, raised to {}",
                config.dataset_size
            ),
            DatasetSizeFit::Derived { configured } => log::info!(
                "dataset_size {configured} replaced by the loaded corpus size {}",
                config.dataset_size
            ),
            DatasetSizeFit::BeyondRecords { id_bound } => log::warn!(
                "dataset_size {} exceeds the classified ids (< {id_bound}), keeping it",
                config.dataset_size
            ),
        }
        config.validate()?;

        let file_store = if options.durable_writes {
            FileStore::new(&session_dir).with_durability(WriteDurability::Durable)
        } else {
            FileStore::new(&session_dir)
        };
        let mut store = SessionStore::new(file_store);
        if options.reset {
            store.reset()?;
            log::info!("session reset");
        }

        let source = StaticPageSource::from_dataset(&dataset, targets, config.page_capacity())
            .with_query_log(QueryLog::new(&session_dir, run_id()));

        gasearch::tui::run(dataset, config, messages, Box::new(source), store)
    })();

    if let Err(err) = result {
        log::error!("{err}");
        eprintln!("gasearch: {err}");
        std::process::exit(1);
    }
}
