//! BioLedger CLI — drive the record registries against a local ledger file
//!
//! Commands:
//!   bioledger project     — create/mutate/read project records
//!   bioledger construct   — mint, transfer, and read construct tokens
//!   bioledger experiment  — create/mutate/read experiment records
//!   bioledger journal     — show a registry's transition history
//!   bioledger backup      — create/list/restore/verify ledger snapshots
//!   bioledger summary     — one-line ledger overview
//!   bioledger demo        — walk one full collaborative workflow

use bioledger_core::storage::backup::BackupManager;
use bioledger_core::{ExperimentStatus, LedgerStore, ProjectStatus};
use std::env;

const STORE_FILE: &str = "bioledger-store.json";
const BACKUP_DIR: &str = "bioledger-backups";
const STORE_OWNER: &str = "local";

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        BioLedger — synthetic-biology record registries       ║
╚══════════════════════════════════════════════════════════════╝

Usage: bioledger <command> [options]

Commands:
  project create     <owner> <name> <description>             Create a project
  project add-collab <caller> <id> <collaborator>             Add a collaborator
  project set-status <caller> <id> <active|completed|cancelled>
  project show       <id>                                     Show one project
  project list                                                List all projects

  construct create   <caller> <name> <description> <sequence> Mint a construct token
  construct transfer <caller> <id> <sender> <recipient>       Transfer ownership
  construct show     <id>                                     Show one token
  construct last-id                                           Highest token id issued
  construct list                                              List all tokens

  experiment create     <caller> <construct-id> <protocol>    Record an experiment
  experiment set-status <caller> <id> <pending|in-progress|completed|failed>
  experiment results    <caller> <id> <text>                  Submit results
  experiment show       <id>                                  Show one experiment
  experiment list                                             List all experiments

  journal    [project|construct|experiment]                   Transition history
  backup     [create|list|restore <ver>|verify]               Snapshot management
  summary                                                     Ledger overview
  demo                                                        Run a full workflow

Examples:
  bioledger project create alice "CRISPR screen" "genome-wide knockout screen"
  bioledger construct create alice promoter-v2 "strong promoter" TTGACA
  bioledger construct transfer alice 1 alice bob
  bioledger experiment create bob 1 "PCR amplification, 30 cycles"
  bioledger backup create
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "project" => cmd_project(&args[2..]),
        "construct" => cmd_construct(&args[2..]),
        "experiment" => cmd_experiment(&args[2..]),
        "journal" => cmd_journal(&args[2..]),
        "backup" => cmd_backup(&args[2..]),
        "summary" => cmd_summary(),
        "demo" => cmd_demo(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}

fn load_store() -> LedgerStore {
    let store = LedgerStore::open(STORE_FILE, STORE_OWNER);
    if store.record_count() > 0 {
        println!("  Loaded {} record(s) from {}", store.record_count(), STORE_FILE);
    }
    store
}

fn save_store(store: &LedgerStore) {
    if let Err(e) = store.save() {
        eprintln!("  Failed to save: {}", e);
    } else {
        println!("  Saved to {}", STORE_FILE);
    }
}

fn cmd_project(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: bioledger project <create|add-collab|set-status|show|list> ...");
        return;
    }

    match args[0].as_str() {
        "create" => {
            if args.len() < 4 {
                eprintln!("Usage: bioledger project create <owner> <name> <description>");
                return;
            }
            let mut store = load_store();
            let id = store.projects.create_project(&args[1], &args[2], &args[3]);
            println!("\n  Created project #{}", id);
            println!("  {}", store.projects.get_project(id).unwrap().summary());
            save_store(&store);
        }
        "add-collab" => {
            if args.len() < 4 {
                eprintln!("Usage: bioledger project add-collab <caller> <id> <collaborator>");
                return;
            }
            let id: u64 = args[2].parse().expect("project id must be a number");
            let mut store = load_store();
            match store.projects.add_collaborator(&args[1], id, &args[3]) {
                Ok(()) => {
                    println!("  Added {} to project #{}", args[3], id);
                    save_store(&store);
                }
                Err(e) => eprintln!("  Error {}: {}", e.code(), e),
            }
        }
        "set-status" => {
            if args.len() < 4 {
                eprintln!("Usage: bioledger project set-status <caller> <id> <status>");
                return;
            }
            let id: u64 = args[2].parse().expect("project id must be a number");
            let status = match ProjectStatus::parse(&args[3]) {
                Some(s) => s,
                None => {
                    eprintln!("  Unknown status '{}': use active|completed|cancelled", args[3]);
                    return;
                }
            };
            let mut store = load_store();
            match store.projects.update_status(&args[1], id, status) {
                Ok(()) => {
                    println!("  Project #{} is now {}", id, status);
                    save_store(&store);
                }
                Err(e) => eprintln!("  Error {}: {}", e.code(), e),
            }
        }
        "show" => {
            if args.len() < 2 {
                eprintln!("Usage: bioledger project show <id>");
                return;
            }
            let id: u64 = args[1].parse().expect("project id must be a number");
            let store = load_store();
            match store.projects.get_project(id) {
                Some(p) => {
                    println!("\n  {}", p.summary());
                    println!("  description: {}", p.description);
                    println!("  collaborators: {:?}", p.collaborators);
                }
                None => println!("  Project #{} not found", id),
            }
        }
        "list" => {
            let store = load_store();
            if store.projects.is_empty() {
                println!("\n  No projects yet.");
                return;
            }
            println!("\n  Projects ({}):", store.projects.len());
            println!("  {}", "-".repeat(72));
            for p in store.projects.list() {
                println!("  {}", p.summary());
            }
        }
        other => eprintln!("Unknown project subcommand: {}", other),
    }
}

fn cmd_construct(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: bioledger construct <create|transfer|show|last-id|list> ...");
        return;
    }

    match args[0].as_str() {
        "create" => {
            if args.len() < 5 {
                eprintln!("Usage: bioledger construct create <caller> <name> <description> <sequence>");
                return;
            }
            let mut store = load_store();
            let id = store.constructs.create_construct(&args[1], &args[2], &args[3], &args[4]);
            println!("\n  Minted construct #{}", id);
            println!("  {}", store.constructs.get_construct_data(id).unwrap().summary());
            save_store(&store);
        }
        "transfer" => {
            if args.len() < 5 {
                eprintln!("Usage: bioledger construct transfer <caller> <id> <sender> <recipient>");
                return;
            }
            let id: u64 = args[2].parse().expect("token id must be a number");
            let mut store = load_store();
            match store.constructs.transfer(&args[1], id, &args[3], &args[4]) {
                Ok(()) => {
                    println!("  Construct #{} now owned by {}", id, args[4]);
                    save_store(&store);
                }
                Err(e) => eprintln!("  Error {}: {}", e.code(), e),
            }
        }
        "show" => {
            if args.len() < 2 {
                eprintln!("Usage: bioledger construct show <id>");
                return;
            }
            let id: u64 = args[1].parse().expect("token id must be a number");
            let store = load_store();
            match store.constructs.get_construct_data(id) {
                Some(t) => {
                    println!("\n  {}", t.summary());
                    println!("  creator: {}", t.creator);
                    println!("  description: {}", t.description);
                    println!("  sequence: {}", t.sequence);
                }
                None => println!("  Construct #{} not found", id),
            }
        }
        "last-id" => {
            let store = load_store();
            println!("  Last token id: {}", store.constructs.last_token_id());
        }
        "list" => {
            let store = load_store();
            if store.constructs.is_empty() {
                println!("\n  No constructs yet.");
                return;
            }
            println!("\n  Constructs ({}):", store.constructs.len());
            println!("  {}", "-".repeat(72));
            for t in store.constructs.list() {
                println!("  {}", t.summary());
            }
        }
        other => eprintln!("Unknown construct subcommand: {}", other),
    }
}

fn cmd_experiment(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: bioledger experiment <create|set-status|results|show|list> ...");
        return;
    }

    match args[0].as_str() {
        "create" => {
            if args.len() < 4 {
                eprintln!("Usage: bioledger experiment create <caller> <construct-id> <protocol>");
                return;
            }
            let construct_id: u64 = args[2].parse().expect("construct id must be a number");
            let mut store = load_store();
            let id = store.experiments.create_experiment(&args[1], construct_id, &args[3]);
            println!("\n  Recorded experiment #{}", id);
            println!("  {}", store.experiments.get_experiment(id).unwrap().summary());
            save_store(&store);
        }
        "set-status" => {
            if args.len() < 4 {
                eprintln!("Usage: bioledger experiment set-status <caller> <id> <status>");
                return;
            }
            let id: u64 = args[2].parse().expect("experiment id must be a number");
            let status = match ExperimentStatus::parse(&args[3]) {
                Some(s) => s,
                None => {
                    eprintln!(
                        "  Unknown status '{}': use pending|in-progress|completed|failed",
                        args[3]
                    );
                    return;
                }
            };
            let mut store = load_store();
            match store.experiments.update_status(&args[1], id, status) {
                Ok(()) => {
                    println!("  Experiment #{} is now {}", id, status);
                    save_store(&store);
                }
                Err(e) => eprintln!("  Error {}: {}", e.code(), e),
            }
        }
        "results" => {
            if args.len() < 4 {
                eprintln!("Usage: bioledger experiment results <caller> <id> <text>");
                return;
            }
            let id: u64 = args[2].parse().expect("experiment id must be a number");
            let mut store = load_store();
            match store.experiments.submit_results(&args[1], id, &args[3]) {
                Ok(()) => {
                    println!("  Results recorded for experiment #{}", id);
                    save_store(&store);
                }
                Err(e) => eprintln!("  Error {}: {}", e.code(), e),
            }
        }
        "show" => {
            if args.len() < 2 {
                eprintln!("Usage: bioledger experiment show <id>");
                return;
            }
            let id: u64 = args[1].parse().expect("experiment id must be a number");
            let store = load_store();
            match store.experiments.get_experiment(id) {
                Some(e) => {
                    println!("\n  {}", e.summary());
                    println!("  protocol: {}", e.protocol);
                    if let Some(results) = &e.results {
                        println!("  results: {}", results);
                    }
                }
                None => println!("  Experiment #{} not found", id),
            }
        }
        "list" => {
            let store = load_store();
            if store.experiments.is_empty() {
                println!("\n  No experiments yet.");
                return;
            }
            println!("\n  Experiments ({}):", store.experiments.len());
            println!("  {}", "-".repeat(72));
            for e in store.experiments.list() {
                println!("  {}", e.summary());
            }
        }
        other => eprintln!("Unknown experiment subcommand: {}", other),
    }
}

fn cmd_journal(args: &[String]) {
    let store = load_store();
    let journals = [
        store.projects.journal(),
        store.constructs.journal(),
        store.experiments.journal(),
    ];
    let filter = args.first().map(|s| s.as_str());

    for journal in journals {
        if let Some(kind) = filter {
            if journal.kind().name() != kind {
                continue;
            }
        }
        println!(
            "\n  {} journal — {} entries, chain {}",
            journal.kind(),
            journal.len(),
            if journal.verify_chain() { "OK" } else { "BROKEN" }
        );
        for entry in journal.entries() {
            println!(
                "  #{:<4} {:<16} record {:<4} by {:<12} {}",
                entry.seq, entry.op, entry.record_id, entry.actor, entry.note
            );
        }
    }
}

fn cmd_backup(args: &[String]) {
    let action = args.first().map(|s| s.as_str()).unwrap_or("list");
    let mut mgr = BackupManager::new(BACKUP_DIR);

    match action {
        "create" => {
            let store = load_store();
            match mgr.snapshot(&store, "manual snapshot") {
                Ok(meta) => println!(
                    "  Snapshot v{} created ({} records, {} bytes)",
                    meta.version, meta.record_count, meta.size_bytes
                ),
                Err(e) => eprintln!("  Snapshot failed: {}", e),
            }
        }
        "list" => {
            if mgr.snapshot_count() == 0 {
                println!("  No snapshots in {}", BACKUP_DIR);
                return;
            }
            println!("\n  Snapshots ({}, {} bytes total):", mgr.snapshot_count(), mgr.total_size());
            for meta in mgr.list_snapshots() {
                println!(
                    "  v{:<4} {} | {} record(s) | {}",
                    meta.version,
                    meta.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    meta.record_count,
                    meta.description
                );
            }
        }
        "restore" => {
            let version: u64 = match args.get(1).and_then(|v| v.parse().ok()) {
                Some(v) => v,
                None => {
                    eprintln!("Usage: bioledger backup restore <version>");
                    return;
                }
            };
            match mgr.restore(version) {
                Ok(mut store) => {
                    store.path = STORE_FILE.into();
                    save_store(&store);
                    println!("  Restored snapshot v{} into {}", version, STORE_FILE);
                }
                Err(e) => eprintln!("  Restore failed: {}", e),
            }
        }
        "verify" => {
            for (version, ok) in mgr.verify_all() {
                println!("  v{:<4} {}", version, if ok { "OK" } else { "CORRUPT" });
            }
        }
        other => eprintln!("Unknown backup subcommand: {}", other),
    }
}

fn cmd_summary() {
    let store = load_store();
    println!("\n  {}", store.summary());
    println!(
        "  journals: {}",
        if store.verify_journals() { "all chains OK" } else { "CHAIN BROKEN" }
    );
    if let Ok(checksum) = store.checksum() {
        println!("  state checksum: {}", &checksum[..16]);
    }
}

fn cmd_demo() {
    println!("\n  BioLedger demo — one collaborative workflow\n");
    let mut store = load_store();

    let project = store.projects.create_project(
        "alice",
        "thermostable GFP",
        "engineer a GFP variant stable at 65C",
    );
    store.projects.add_collaborator("alice", project, "bob").unwrap();
    store.projects.add_collaborator("alice", project, "carol").unwrap();
    println!("  {}", store.projects.get_project(project).unwrap().summary());

    let token = store.constructs.create_construct(
        "alice",
        "gfp-t65",
        "GFP with stabilizing mutations",
        "ATGGTGAGCAAGGGCGAGGAG",
    );
    println!("  {}", store.constructs.get_construct_data(token).unwrap().summary());

    store.constructs.transfer("alice", token, "alice", "bob").unwrap();
    println!("  Transferred construct #{} to bob", token);

    let experiment = store.experiments.create_experiment(
        "bob",
        token,
        "express in E. coli, heat-shock at 65C, measure fluorescence",
    );
    store
        .experiments
        .update_status("bob", experiment, ExperimentStatus::InProgress)
        .unwrap();
    store
        .experiments
        .submit_results("bob", experiment, "87% fluorescence retained after 30 min at 65C")
        .unwrap();
    store
        .experiments
        .update_status("bob", experiment, ExperimentStatus::Completed)
        .unwrap();
    println!("  {}", store.experiments.get_experiment(experiment).unwrap().summary());

    store.projects.update_status("alice", project, ProjectStatus::Completed).unwrap();

    // An unauthorized mutation bounces off without touching state.
    let denied = store.experiments.submit_results("mallory", experiment, "forged");
    println!("  Mallory's forgery attempt: error {}", denied.unwrap_err().code());

    println!("\n  {}", store.summary());
    save_store(&store);

    let mut mgr = BackupManager::new(BACKUP_DIR);
    if let Ok(meta) = mgr.snapshot(&store, "demo workflow") {
        println!("  Snapshot v{} archived", meta.version);
    }
}
