//! CLI orchestration entry point.
//!
//! # Responsibility
//! - Import exported record files into the snapshot store.
//! - Run aggregation and graph construction offline from capture.
//! - Keep output deterministic for quick local sanity checks.

use kithmap_core::db::open_db;
use kithmap_core::{
    normalize_record, to_dot, ContactRecord, GraphOptions, RecordService, SocialNode,
    SqliteRecordStore,
};
use std::env;
use std::fs;
use std::process::ExitCode;

const USAGE: &str = "usage:
  kithmap import <records.json> <db>
  kithmap graph <db> [--usernames] [--personal-only] [--dot]
  kithmap version";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("kithmap: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    match args.first().map(String::as_str) {
        Some("import") => import(&args[1..]),
        Some("graph") => graph(&args[1..]),
        Some("version") => {
            println!("kithmap_core version={}", kithmap_core::core_version());
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

/// Reads a JSON array of contact records, normalizes phone numbers and
/// replaces the stored snapshot.
fn import(args: &[String]) -> Result<(), String> {
    let [records_path, db_path] = args else {
        return Err(USAGE.to_string());
    };

    let raw = fs::read_to_string(records_path)
        .map_err(|err| format!("failed to read `{records_path}`: {err}"))?;
    let records: Vec<ContactRecord> = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse `{records_path}`: {err}"))?;
    let normalized: Vec<ContactRecord> = records.iter().map(normalize_record).collect();

    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let service = RecordService::new(SqliteRecordStore::new(&conn));
    service
        .save_records(&normalized)
        .map_err(|err| err.to_string())?;

    println!("imported records={}", normalized.len());
    Ok(())
}

/// Aggregates the stored snapshot and prints the derived graph.
fn graph(args: &[String]) -> Result<(), String> {
    let Some(db_path) = args.first() else {
        return Err(USAGE.to_string());
    };

    let mut options = GraphOptions::default();
    let mut emit_dot = false;
    for flag in &args[1..] {
        match flag.as_str() {
            "--usernames" => options.usernames = true,
            "--personal-only" => options.personal_only = true,
            "--dot" => emit_dot = true,
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
    }

    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let service = RecordService::new(SqliteRecordStore::new(&conn));
    let aggregator = service.aggregate().map_err(|err| err.to_string())?;
    let graph = aggregator.build_graph(&options);

    if emit_dot {
        print!("{}", to_dot(&graph));
    } else {
        let person_nodes = graph
            .node_weights()
            .filter(|node| matches!(node, SocialNode::Person { .. }))
            .count();
        println!(
            "identities={} communities={} nodes={} person_nodes={} edges={}",
            aggregator.identities().len(),
            aggregator.community_count(),
            graph.node_count(),
            person_nodes,
            graph.edge_count()
        );
    }
    Ok(())
}
