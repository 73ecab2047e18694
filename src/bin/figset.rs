// FIGSET v0.1.0
// Copyright 2021-2022, Jean Pierre Both and Jianshu Zhao.
// Licensed under the MIT license (http://opensource.org/licenses/MIT).
// This file may not be copied, modified, or distributed except according to those terms.

//! figset [--output dir] [--params file] command
//!
//! - compare dir [--transpose] : reads per-genome protein tables of dir (RAST csv exports),
//!     dumps common_proteins.csv, unique_proteins.csv, all_proteins.csv, genomes.json and summary.json.
//!     --transpose also dumps unique_proteins_wide.csv, one column of unique families per genome.
//!
//! - collate --all-proteins file --subsystems-dir dir : builds a feature index from all_proteins.csv (or any
//!     table in the same format), joins the subsystem exports of dir and dumps proteins.json
//!
//! - similarity [--genomes file] : reloads genomes.json (default in output directory) and dumps similarity.csv
//!
//! - rename-subsystems dir [--no-simulate] : renames subsystem exports after the genome of their first feature.
//!     Without --no-simulate only logs what would be done.
//!
//! --params reloads a parameters.json dumped by a previous run (column names, delimiters, markers).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};

// for logging (debug mostly, switched at compile time in cargo.toml)
use env_logger::Builder;

use figset::featureindex::FeatureIndex;
use figset::ingest::AnalysisSession;
use figset::partition::partition;
use figset::records::{read_master_file, MasterRow};
use figset::registry::FamilyRegistry;
use figset::report;
use figset::similarity::similarity_matrix;
use figset::subsystem::SubsystemJoiner;
use figset::utils::dumpload::*;
use figset::utils::*;

// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}

fn compare(params: &RunParams, matches: &ArgMatches) -> anyhow::Result<()> {
    let datadir = matches
        .get_one::<String>("directory")
        .context("directory is mandatory")?;
    let dirpath = Path::new(datadir);
    if !dirpath.is_dir() {
        anyhow::bail!("error not a directory : {:?}", datadir);
    }
    let output_dir = params.get_output_dir();
    //
    let mut session = AnalysisSession::new(params.get_ingest_params().clone());
    session
        .ingest_dir(dirpath)
        .with_context(|| format!("reading genome tables of {:?}", dirpath))?;
    let counters = session.get_counters();
    println!(
        "total skipped entries: {} ({:.2} % of total), hypothetical: {}",
        counters.skipped_no_fig,
        counters.percentage_skipped(),
        counters.skipped_hypothetical
    );
    //
    let part = partition(&session.genome_sets())?;
    println!("total distinct proteins: {}", part.get_all_distinct().len());
    println!("total common proteins: {}", part.get_common().len());
    for genome in session.get_genomes() {
        let nb_unique = part.get_unique(genome.get_genome_id()).map(|s| s.len()).unwrap_or(0);
        println!("file {} has {} unique proteins", genome.get_source_name(), nb_unique);
    }
    //
    let registry = session.get_registry();
    let common = report::common_rows(&part, registry);
    dump_csv_rows(&output_dir.join("common_proteins.csv"), report::CommonRow::HEADER, &common)?;
    let unique = report::unique_rows(&part, session.get_genomes(), registry);
    dump_csv_rows(&output_dir.join("unique_proteins.csv"), report::UniqueRow::HEADER, &unique)?;
    if params.get_transpose() {
        dump_wide_table(&output_dir.join("unique_proteins_wide.csv"), &report::unique_wide(&part))?;
    }
    dump_csv_rows(
        &output_dir.join("all_proteins.csv"),
        MasterRow::HEADER,
        &report::family_rows(registry),
    )?;
    dump_json(&output_dir.join("genomes.json"), &report::genome_dump(session.get_genomes()))?;
    let summary = report::summary(counters, session.get_genomes().len(), &part);
    dump_json(&output_dir.join("summary.json"), &summary)?;
    //
    Ok(())
} // end of compare

fn collate(params: &RunParams, matches: &ArgMatches) -> anyhow::Result<()> {
    let all_proteins = matches
        .get_one::<String>("all_proteins")
        .context("--all-proteins is mandatory")?;
    let subsystems_dir = matches
        .get_one::<String>("subsystems_dir")
        .context("--subsystems-dir is mandatory")?;
    //
    let master = read_master_file(Path::new(all_proteins)).with_context(|| format!("reading {}", all_proteins))?;
    let mut registry = FamilyRegistry::new();
    let index = FeatureIndex::build(&master, &mut registry);
    if !index.get_ambiguities().is_empty() {
        println!(
            "{} features claimed by more than one family (last one kept)",
            index.get_ambiguities().len()
        );
    }
    //
    let mut joiner = SubsystemJoiner::new(&index);
    let total = joiner
        .join_dir(Path::new(subsystems_dir), params.get_subsystem_params(), &mut registry)
        .with_context(|| format!("joining subsystems of {}", subsystems_dir))?;
    for (source, stats) in joiner.get_per_source() {
        println!(
            "{} : processed {}, skipped {} ({:.2} %)",
            source,
            stats.processed,
            stats.skipped,
            stats.percentage_skipped()
        );
    }
    println!(
        "total processed {}, skipped {} ({:.2} %)",
        total.processed,
        total.skipped,
        total.percentage_skipped()
    );
    dump_json(
        &params.get_output_dir().join("proteins.json"),
        &report::category_dump(&registry),
    )?;
    Ok(())
} // end of collate

fn similarity(params: &RunParams, matches: &ArgMatches) -> anyhow::Result<()> {
    let genomes_path = match matches.get_one::<String>("genomes") {
        Some(path) => PathBuf::from(path),
        None => params.get_output_dir().join("genomes.json"),
    };
    let dump = reload_genome_dump(&genomes_path).with_context(|| format!("reloading {:?}", genomes_path))?;
    let matrix = similarity_matrix(&genome_sets_from_dump(&dump))?;
    dump_similarity(&params.get_output_dir().join("similarity.csv"), &matrix)?;
    Ok(())
} // end of similarity

fn rename_subsystems(params: &RunParams, matches: &ArgMatches) -> anyhow::Result<()> {
    let datadir = matches
        .get_one::<String>("directory")
        .context("directory is mandatory")?;
    let simulate = !matches.get_flag("no_simulate");
    let renamed = rename_subsystem_files(Path::new(datadir), params.get_subsystem_params(), simulate)?;
    for (old, new) in &renamed {
        println!("rename {:?} to {:?}", old, new);
    }
    if simulate {
        println!("simulation only, pass --no-simulate to rename");
    }
    Ok(())
} // end of rename_subsystems

//============================================================================================

fn main() -> anyhow::Result<()> {
    let _ = init_log();
    let start_t = chrono::Local::now();
    log::info!("\n figset begins at time:{:#?} \n ", start_t);

    let compare_cmd = Command::new("compare")
        .about("Families common to all genomes and unique to each genome, from a directory of genome tables")
        .arg(
            Arg::new("directory")
                .help("directory with one protein table per genome")
                .required(true)
                .value_name("DIRECTORY")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("transpose")
                .long("transpose")
                .help("also dump unique families as one column per genome")
                .action(ArgAction::SetTrue),
        );

    let collate_cmd = Command::new("collate")
        .about("Join subsystem data onto families for visualization")
        .arg(
            Arg::new("all_proteins")
                .long("all-proteins")
                .value_name("FILE")
                .help("the csv file with all proteins in it")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("subsystems_dir")
                .long("subsystems-dir")
                .value_name("DIRECTORY")
                .help("the directory with the subsystem exports")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        );

    let similarity_cmd = Command::new("similarity")
        .about("Pairwise similarity matrix between genomes")
        .arg(
            Arg::new("genomes")
                .long("genomes")
                .value_name("FILE")
                .help("genome dump, defaults to genomes.json in output directory")
                .required(false)
                .value_parser(clap::value_parser!(String)),
        );

    let rename_cmd = Command::new("rename-subsystems")
        .about("Rename subsystem exports after the genome of their first feature")
        .arg(
            Arg::new("directory")
                .help("directory with subsystem exports")
                .required(true)
                .value_name("DIRECTORY")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("no_simulate")
                .long("no-simulate")
                .help("set to actually perform the renaming")
                .action(ArgAction::SetTrue),
        );

    //
    // the global command
    //
    let matches = Command::new("figset")
        .version("0.1.0")
        .about("Protein family sets across genomes: common, unique, subsystems and similarity")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIRECTORY")
                .help("output directory, created if needed (default output)")
                .required(false)
                .global(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("params")
                .long("params")
                .value_name("FILE")
                .help("parameters.json dumped by a previous run")
                .required(false)
                .global(true)
                .value_parser(clap::value_parser!(String)),
        )
        .subcommand(compare_cmd)
        .subcommand(collate_cmd)
        .subcommand(similarity_cmd)
        .subcommand(rename_cmd)
        .get_matches();

    let mut params = match matches.get_one::<String>("params") {
        Some(path) => RunParams::reload_json(Path::new(path)).with_context(|| format!("reloading parameters {}", path))?,
        None => RunParams::default(),
    };
    if let Some(output) = matches.get_one::<String>("output") {
        params.set_output_dir(PathBuf::from(output));
    }
    //
    match matches.subcommand() {
        Some(("rename-subsystems", sub_m)) => {
            rename_subsystems(&params, sub_m)?;
        }
        Some((name, sub_m)) => {
            create_output_dir(params.get_output_dir())?;
            if name == "compare" && sub_m.get_flag("transpose") {
                params.set_transpose(true);
            }
            match name {
                "compare" => compare(&params, sub_m)?,
                "collate" => collate(&params, sub_m)?,
                "similarity" => similarity(&params, sub_m)?,
                _ => anyhow::bail!("unknown command {}", name),
            }
            params.dump_json(params.get_output_dir())?;
        }
        None => anyhow::bail!("a command is required"),
    }
    //
    let end_t = chrono::Local::now();
    log::info!(
        "figset ended at time:{:#?}, elapsed : {} ms",
        end_t,
        (end_t - start_t).num_milliseconds()
    );
    Ok(())
} // end of main
