//! Brand Forge - pronounceable brand name generation
//!
//! A small CLI over the brand_forge library: generate ranked name
//! candidates, score a single name, or list the style presets.

use std::env;
use std::process;
use std::sync::Arc;

use brand_forge::{
    BrandConfig, BrandForgeError, GenerationRequest, GenerationResult, NameForge, Result,
    ScoreBreakdown, Scorer,
};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "BRAND_FORGE_CONFIG";

#[derive(Debug, PartialEq)]
enum Command {
    Generate,
    Score(String),
    Styles,
    Help,
}

#[derive(Debug)]
struct CliArgs {
    command: Command,
    length: usize,
    count: usize,
    style: Option<String>,
    tlds: Vec<String>,
    seed: Option<u64>,
    pattern: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    scored: bool,
    json: bool,
    config_path: Option<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        let defaults = GenerationRequest::default();
        Self {
            command: Command::Generate,
            length: defaults.length,
            count: defaults.count,
            style: None,
            tlds: defaults.tlds,
            seed: None,
            pattern: None,
            prefix: None,
            suffix: None,
            scored: true,
            json: false,
            config_path: None,
        }
    }
}

fn main() {
    // Initialize the library
    if let Err(e) = brand_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

/// Structured logs go to stderr so stdout stays clean for `--json`
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &[String]) -> Result<()> {
    let cli = parse_args(args)?;

    if cli.command == Command::Help {
        print_help();
        return Ok(());
    }

    let config = load_config(cli.config_path.as_deref())?;

    match &cli.command {
        Command::Styles => {
            print_styles(&config);
            Ok(())
        }
        Command::Score(target) => score_name(&config, target, cli.json),
        _ => generate(&config, &cli),
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.command = Command::Help,
            "--styles" => cli.command = Command::Styles,
            "--score" => cli.command = Command::Score(flag_value(&mut iter, arg)?),
            "--length" | "-l" => cli.length = parse_number(&flag_value(&mut iter, arg)?, arg)?,
            "--count" | "-n" => cli.count = parse_number(&flag_value(&mut iter, arg)?, arg)?,
            "--seed" => cli.seed = Some(parse_number(&flag_value(&mut iter, arg)?, arg)?),
            "--style" | "-s" => cli.style = Some(flag_value(&mut iter, arg)?),
            "--pattern" | "-p" => cli.pattern = Some(flag_value(&mut iter, arg)?),
            "--prefix" => cli.prefix = Some(flag_value(&mut iter, arg)?),
            "--suffix" => cli.suffix = Some(flag_value(&mut iter, arg)?),
            "--config" => cli.config_path = Some(flag_value(&mut iter, arg)?),
            "--tld" | "-t" => {
                cli.tlds = flag_value(&mut iter, arg)?
                    .split(',')
                    .map(str::trim)
                    .filter(|tld| !tld.is_empty())
                    .map(String::from)
                    .collect();
            }
            "--unscored" => cli.scored = false,
            "--json" => cli.json = true,
            other => {
                return Err(BrandForgeError::cli(format!("unknown argument '{}'", other)));
            }
        }
    }

    Ok(cli)
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| BrandForgeError::cli(format!("{} requires a value", flag)))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| BrandForgeError::cli(format!("{} expects a number, got '{}'", flag, value)))
}

/// `--config` wins over `BRAND_FORGE_CONFIG`; otherwise the builtin configuration
fn load_config(path: Option<&str>) -> Result<Arc<BrandConfig>> {
    let path = path.map(String::from).or_else(|| env::var(CONFIG_ENV).ok());
    match path {
        Some(path) => Ok(Arc::new(BrandConfig::load(&path)?)),
        None => BrandConfig::shared(),
    }
}

fn generate(config: &BrandConfig, cli: &CliArgs) -> Result<()> {
    let request = GenerationRequest {
        length: cli.length,
        count: cli.count,
        tlds: cli.tlds.clone(),
        style: cli
            .style
            .clone()
            .unwrap_or_else(|| config.default_style().to_string()),
        seed: cli.seed,
        scored: cli.scored,
        pattern: cli.pattern.clone(),
        prefix: cli.prefix.clone(),
        suffix: cli.suffix.clone(),
    };

    let forge = NameForge::new(config);
    let result = forge.generate(&request)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_result(&result);
    }
    Ok(())
}

fn display_result(result: &GenerationResult) {
    let meta = &result.metadata;

    println!("🔥 Brand Forge - brandable name generation");
    println!("══════════════════════════════════════════");
    println!();
    println!("🎨 Generated Names ({}):", meta.returned_count);
    println!("═══════════════════");

    for (idx, candidate) in result.candidates.iter().enumerate() {
        let score = candidate
            .score
            .map_or_else(|| "--".to_string(), |score| score.to_string());
        println!(
            "{:3}. {:<20} {:>3}  {:<12} {}",
            idx + 1,
            candidate.get_full_domain(),
            score,
            candidate.pattern,
            candidate.units.join("-")
        );
    }
    println!();

    println!("📈 Summary:");
    println!("   🎯 Requested: {}", meta.requested_count);
    println!("   🧪 Raw pool: {}", meta.generated_count);
    println!("   ✅ Returned: {}", meta.returned_count);
    println!("   🔁 Attempts: {}", meta.attempts);
    println!("   🎨 Style: {}", meta.style);
    if let Some(seed) = meta.seed {
        println!("   🌱 Seed: {}", seed);
    }
    println!("   ⏱️  Time: {}ms", meta.duration_ms);

    if meta.is_shortfall() {
        println!();
        println!(
            "⚠️  Only {} of {} names could be built. Try another style, length or pattern.",
            meta.returned_count, meta.requested_count
        );
    }
}

/// `NAME` or `NAME:u1,u2,..`; the slot template comes from the units
fn score_name(config: &BrandConfig, target: &str, json: bool) -> Result<()> {
    let (name, units) = match target.split_once(':') {
        Some((name, units)) => (
            name.trim().to_lowercase(),
            units
                .split(',')
                .map(|unit| unit.trim().to_lowercase())
                .filter(|unit| !unit.is_empty())
                .collect::<Vec<_>>(),
        ),
        None => (target.trim().to_lowercase(), Vec::new()),
    };

    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_lowercase()) {
        return Err(BrandForgeError::cli(format!("'{}' is not a plain lowercase name", target)));
    }
    if !units.is_empty() && units.concat() != name {
        return Err(BrandForgeError::cli(format!(
            "units '{}' do not spell '{}'",
            units.join(","),
            name
        )));
    }

    let pattern: String = units
        .iter()
        .map(|unit| match unit.chars().next() {
            Some(ch) if brand_forge::types::is_vowel(ch) => 'V',
            _ => 'C',
        })
        .collect();

    let breakdown = Scorer::new(config).score(&name, &units, &pattern);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        display_breakdown(&name, &breakdown);
    }
    Ok(())
}

fn display_breakdown(name: &str, breakdown: &ScoreBreakdown) {
    println!("🔎 Score for \"{}\": {}", name, breakdown.overall);
    println!("─────────────────────────");
    for (dimension, value) in breakdown.dimensions() {
        let bar = "█".repeat((value / 10.0).round() as usize);
        println!("   {:<18} {:>5.1}  {}", dimension, value, bar);
    }
}

fn print_styles(config: &BrandConfig) {
    println!("🎨 Style presets:");
    for name in config.style_names() {
        let marker = if name == config.default_style() { " (default)" } else { "" };
        let description = config.style(name).map_or("", |style| style.description.as_str());
        println!("   • {}{} - {}", name, marker, description);
    }
}

/// Print help information
fn print_help() {
    println!("🔥 Brand Forge - brandable name generation");
    println!("══════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    brand-forge [OPTIONS]");
    println!("    brand-forge --score NAME[:UNITS]");
    println!("    brand-forge --styles");
    println!();
    println!("OPTIONS:");
    println!("    -l, --length N       Name length, 3-12 (default: 5)");
    println!("    -n, --count N        Names to return, 1-1000 (default: 20)");
    println!("    -s, --style NAME     Style preset (see --styles)");
    println!("    -t, --tld a,b        Comma-separated TLDs (default: com)");
    println!("        --seed N         Seed for a reproducible run");
    println!("    -p, --pattern CVCV   Explicit consonant/vowel slot template");
    println!("        --prefix TEXT    Every name starts with TEXT");
    println!("        --suffix TEXT    Every name ends with TEXT");
    println!("        --unscored       Skip scoring, keep generation order");
    println!("        --json           Print the result as JSON");
    println!("        --config PATH    Alternative JSON configuration");
    println!();
    println!("EXAMPLES:");
    println!("    brand-forge --length 6 --count 10 --tld com,io");
    println!("    brand-forge --style technical --seed 42");
    println!("    brand-forge --length 7 --prefix zo --suffix ly");
    println!("    brand-forge --score shalo:sh,a,l,o");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    BRAND_FORGE_CONFIG   Path to a JSON configuration file");
    println!("    RUST_LOG             Log filter (default: warn)");
    println!();
    println!("Made with ❤️ and 🦀 Rust");
}
