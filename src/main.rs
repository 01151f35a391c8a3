// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Jsonode CLI entrypoint.
//!
//! Opens one node of a JSON file, prints its editable view, and optionally commits field edits
//! back into the file.

use std::error::Error;
use std::sync::Arc;

use jsonode::config::EditorConfig;
use jsonode::editor::NodeEditor;
use jsonode::model::JsonPath;
use jsonode::ops::CoercionPolicy;
use jsonode::store::{
    DocumentStore, EditorContents, FileDocumentStore, GraphStore, MemoryEditorStore,
    MemoryGraphStore, WriteDurability,
};
use jsonode::sync::ResyncOutcome;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <file.json> [--path <path>] [--set <key>=<value>]... [--coerce] [--indent <n>] [--durable-writes]\n  {program} <file.json> --list\n\n--path selects a node by its display path, e.g. '$[\"customer\"][\"orders\"][0]' (default '$').\n--set stages one field edit; with at least one --set the edits are committed to the file.\n--coerce writes numbers/booleans/null back as typed values when the field already holds one.\n--indent sets the indentation of the rewritten file (default 2, 0 = compact).\n--list prints the path of every node.\n\nJSONODE_INDENT, JSONODE_RESYNC_DELAY_MS and JSONODE_COERCE provide defaults; flags win."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    path: Option<String>,
    sets: Vec<(String, String)>,
    coerce: bool,
    indent: Option<usize>,
    list: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--path" => {
                if options.path.is_some() {
                    return Err(());
                }
                options.path = Some(args.next().ok_or(())?);
            }
            "--set" => {
                let raw = args.next().ok_or(())?;
                let (key, value) = raw.split_once('=').ok_or(())?;
                if key.is_empty() {
                    return Err(());
                }
                options.sets.push((key.to_owned(), value.to_owned()));
            }
            "--coerce" => {
                if options.coerce {
                    return Err(());
                }
                options.coerce = true;
            }
            "--indent" => {
                if options.indent.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.indent = Some(raw.parse().map_err(|_| ())?);
            }
            "--list" => {
                if options.list {
                    return Err(());
                }
                options.list = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    if options.file.is_none() {
        return Err(());
    }

    if options.list && (!options.sets.is_empty() || options.path.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn print_view(editor: &NodeEditor) -> Result<(), serde_json::Error> {
    println!("{}", editor.render()?);
    println!("path: {}", editor.path_display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jsonode=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "jsonode".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        let file = options.file.clone().unwrap_or_default();

        let mut config = EditorConfig::from_env()?;
        if let Some(indent) = options.indent {
            config.indent = indent;
        }
        if options.coerce {
            config.coercion = CoercionPolicy::MatchExisting;
        }

        let path = match options.path.as_deref() {
            Some(raw) => JsonPath::parse(raw)?,
            None => JsonPath::root(),
        };

        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        let documents = Arc::new(FileDocumentStore::open(&file)?.with_durability(durability));
        let text = documents.text();
        let graph = Arc::new(MemoryGraphStore::from_document(&text)?);

        if options.list {
            for node in graph.nodes() {
                println!("{}", node.path());
            }
            return Ok(());
        }

        if graph.select_path(&path).is_none() {
            return Err(format!("no node at {path}").into());
        }

        let contents = Arc::new(MemoryEditorStore::new(EditorContents::saved(text)));
        let mut editor = NodeEditor::new(documents, contents, graph.clone(), config);
        editor.open();

        if options.sets.is_empty() {
            print_view(&editor)?;
            return Ok(());
        }

        editor.begin_edit()?;
        for (key, value) in options.sets {
            editor.stage_field(key, value)?;
        }
        let outcome = editor.commit()?;
        tracing::info!(
            file = %file,
            path = %path,
            written = outcome.result.written,
            "document updated"
        );

        graph.recompute(&outcome.text)?;
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        if let ResyncOutcome::Selected(_) = runtime.block_on(outcome.resync.run()) {
            editor.refresh();
        }

        print_view(&editor)?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("jsonode: {err}");
        std::process::exit(1);
    }
}
