//! Radiant Groups: zeigt die Selektionsgruppen einer Map-Info-Datei an.
//!
//! Aufruf: `radiant-groups <datei.darkradiant> [--json]`

use anyhow::Context;
use radiant_scene_groups::info_file::{
    parse_info_file, InfoFileModule, SelectionGroupInfoFileModule, SelectionGroupSummary,
};
use radiant_scene_groups::EditorOptions;
use std::path::PathBuf;

/// Kommandozeilen-Argumente
#[derive(Debug)]
struct CliArgs {
    path: PathBuf,
    json: bool,
}

impl CliArgs {
    fn parse(args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut path = None;
        let mut json = false;
        for arg in args {
            match arg.as_str() {
                "--json" => json = true,
                "-h" | "--help" => {
                    anyhow::bail!("Aufruf: radiant-groups <datei.darkradiant> [--json]")
                }
                flag if flag.starts_with("--") => anyhow::bail!("Unbekannte Option: {}", flag),
                _ if path.is_none() => path = Some(PathBuf::from(arg)),
                _ => anyhow::bail!("Mehr als eine Datei angegeben: {}", arg),
            }
        }
        let path = path.context("Aufruf: radiant-groups <datei.darkradiant> [--json]")?;
        Ok(Self { path, json })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::debug!("Radiant Groups v{}", env!("CARGO_PKG_VERSION"));

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let options = EditorOptions::load_from_file(&EditorOptions::config_path());

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Datei konnte nicht gelesen werden: {}", args.path.display()))?;

    let mut module = SelectionGroupInfoFileModule::from_options(&options);
    {
        let mut modules: [&mut dyn InfoFileModule; 1] = [&mut module];
        parse_info_file(&content, &mut modules)
            .with_context(|| format!("Info-Datei fehlerhaft: {}", args.path.display()))?;
    }
    let summary = module.summary(&options.group_label_prefix);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &SelectionGroupSummary) {
    println!("{} Selektionsgruppen", summary.groups.len());
    for group in &summary.groups {
        println!(
            "  {:>4}  {:<32} {} Nodes",
            group.id, group.display_name, group.node_count
        );
    }

    println!("{} Node-Zuordnungen", summary.mapped_nodes);
    for mapping in &summary.node_mappings {
        let ids: Vec<String> = mapping.group_ids.iter().map(u64::to_string).collect();
        println!("  {:<10} -> {}", mapping.node.to_string(), ids.join(", "));
    }
}
