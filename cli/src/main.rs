use clap::{Parser, Subcommand, ValueEnum};
use dmkit::api::{self, EncounterConfig, SpawnSpec};
use dmkit::checks::{self, RollConfirm};
use dmkit::{AcceptRoll, AdMode, Batch, Combatant, Dice, Record, RecordList, Roll};
use encoding_rs::Encoding;
use std::io::{self, BufRead, Write};
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Adv {
    Normal,
    Advantage,
    Disadvantage,
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll one or more dice expressions (e.g. 2d6, d8+4, 17)
    Roll {
        /// Dice notation
        #[arg(required = true)]
        notation: Vec<String>,
        /// Samples per expression
        #[arg(long, default_value_t = 1)]
        times: usize,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load and print a party of characters
    Party {
        /// YAML file of characters
        #[arg(long, conflicts_with = "builtin")]
        file: Option<PathBuf>,
        /// Builtin party id
        #[arg(long, default_value = "starter")]
        builtin: String,
    },
    /// Load and print monster templates
    Bestiary {
        /// YAML file or directory of YAML files
        #[arg(long, conflicts_with = "builtin")]
        path: Option<PathBuf>,
        /// Builtin bestiary id
        #[arg(long, default_value = "basic")]
        builtin: String,
    },
    /// Ability check for one party member
    Check {
        /// YAML file of characters (defaults to the builtin party)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Character name, abbreviations allowed
        #[arg(long)]
        who: String,
        /// Ability name, abbreviations allowed
        #[arg(long)]
        ability: String,
        /// Difficulty Class to beat (>=)
        #[arg(long, default_value_t = 10)]
        dc: i32,
        /// Advantage mode
        #[arg(long, value_enum, default_value_t = Adv::Normal)]
        adv: Adv,
        /// Ask before keeping the rolled d20
        #[arg(long, default_value_t = false)]
        prompt: bool,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Spawn monsters alongside the party and roll initiative
    Initiative {
        /// Encounter config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// YAML file of characters
        #[arg(long)]
        players: Option<PathBuf>,
        /// YAML file or directory of monster templates
        #[arg(long)]
        monsters: Option<PathBuf>,
        /// Monsters to spawn, as TEMPLATE or TEMPLATE=COUNT
        #[arg(long)]
        spawn: Vec<String>,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
        /// Print the turn order as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Parser)]
#[command(name = "dmkit")]
#[command(about = "Dice, party sheets and initiative for the table")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_mode(a: Adv) -> AdMode {
    match a {
        Adv::Normal => AdMode::Normal,
        Adv::Advantage => AdMode::Advantage,
        Adv::Disadvantage => AdMode::Disadvantage,
    }
}

fn dice(seed: Option<u64>) -> Dice {
    seed.map(Dice::from_seed).unwrap_or_else(Dice::from_entropy)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn path_str(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.display().to_string())
}

fn report_failures<T>(batch: &Batch<T>) {
    for failure in &batch.failures {
        eprintln!("skipped {}", failure);
    }
}

/// Offers each d20 at the terminal; blank keeps it.
struct PromptRoll;

impl RollConfirm for PromptRoll {
    fn confirm(&mut self, label: &str, roll: i32, sides: u32) -> i32 {
        let stdin = io::stdin();
        loop {
            print!("{} rolled {} (enter to keep, or 1-{}): ", label, roll, sides);
            if io::stdout().flush().is_err() {
                return roll;
            }
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return roll,
                Ok(_) => {}
            }
            match checks::parse_override(&line, sides) {
                Some(Some(value)) => return value,
                Some(None) => return roll,
                None => println!("not a d{} face: {}", sides, line.trim()),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Roll { notation, times, seed } => {
            let mut dice = dice(seed);
            for text in &notation {
                let roll: Roll = text.parse()?;
                let samples = dice.repeat(times, &roll);
                let joined = samples.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ");
                println!("{}: {}", roll, joined);
            }
        }
        Cmd::Party { file, builtin } => {
            let batch = api::load_party(path_str(&file).as_deref(), Some(builtin.as_str()))?;
            report_failures(&batch);
            let sheets: RecordList = batch.loaded.iter().map(|c| c.record()).collect();
            println!("{}", sheets);
        }
        Cmd::Bestiary { path, builtin } => {
            let batch = api::load_bestiary(path_str(&path).as_deref(), Some(builtin.as_str()))?;
            report_failures(&batch);
            let sheets: RecordList = batch.loaded.iter().map(|m| m.record()).collect();
            println!("{}", sheets);
        }
        Cmd::Check { file, who, ability, dc, adv, prompt, seed } => {
            let batch = api::load_party(path_str(&file).as_deref(), Some("starter"))?;
            report_failures(&batch);
            let names: Vec<String> = batch.loaded.iter().map(|c| c.name.clone()).collect();
            let index = dmkit::fuzzy::resolve(&who, &names)?;
            let character = Combatant::Character(batch.loaded[index].clone());

            let mut dice = dice(seed);
            let mut confirm: Box<dyn RollConfirm> =
                if prompt { Box::new(PromptRoll) } else { Box::new(AcceptRoll) };
            let modifier = checks::check_modifier(&character, &ability)?;
            let res = checks::check_against(&mut dice, confirm.as_mut(), &character, &ability, dc, to_mode(adv))?;
            println!(
                "{} {} check (mod={:+}): roll={} total={} vs dc={} => {}",
                character.name(),
                ability,
                modifier,
                res.roll,
                res.total,
                res.dc,
                if res.passed { "SUCCESS" } else { "FAIL" }
            );
        }
        Cmd::Initiative { config, players, monsters, spawn, seed, json } => {
            let mut cfg = match &config {
                Some(path) => api::parse_config(&read_text_auto(path)?)?,
                None => EncounterConfig {
                    players_id: Some("starter".into()),
                    monsters_id: Some("basic".into()),
                    ..Default::default()
                },
            };
            if let Some(p) = path_str(&players) {
                cfg.players_path = Some(p);
            }
            if let Some(m) = path_str(&monsters) {
                cfg.monsters_path = Some(m);
            }
            for s in &spawn {
                cfg.spawn.push(SpawnSpec::parse(s)?);
            }
            if seed.is_some() {
                cfg.seed = seed;
            }
            tracing::debug!(spawn = cfg.spawn.len(), seed = ?cfg.seed, "encounter config");

            let report = api::run_encounter(cfg)?;
            for skipped in &report.skipped {
                eprintln!("skipped {}", skipped);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let order: Record = report
                    .order
                    .iter()
                    .map(|t| (t.name.clone(), t.initiative))
                    .collect();
                println!("{}", order);
            }
        }
    }
    Ok(())
}
