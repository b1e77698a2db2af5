use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gdp_dash::format::{fmt_growth, fmt_pct, fmt_scaled, format_number};
use gdp_dash::models::IndexChoice;
use gdp_dash::pipeline::{Dashboard, DashboardView, check_selection};
use gdp_dash::{
    ChartKind, DashboardConfig, Session, StaticCountryTable, TieBreak, YearBoundsPolicy,
};
use gdp_dash::storage;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "gdp-dash",
    version,
    about = "Explore national GDP series: growth, CAGR, base-100 index and rankings"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the available year range and country count of a data file.
    Bounds(InputArgs),
    /// Compute indicators and rankings for a selection (and optionally export it).
    Show(ShowArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartArg {
    Line,
    Bar,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Wide CSV file: `Country Code`, optional `Country Name`, one column per year.
    #[arg(long)]
    data: PathBuf,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Country metadata JSON replacing the embedded table.
    #[arg(long)]
    metadata: Option<PathBuf>,
    /// Widen the selectable range up to this year.
    #[arg(long, conflicts_with = "drop_recent")]
    extend_max_to: Option<i32>,
    /// Exclude the N most recent year columns.
    #[arg(long)]
    drop_recent: Option<u32>,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Year (YYYY) or range (YYYY:YYYY). Defaults to the full range.
    #[arg(short = 'd', long)]
    date: Option<String>,
    /// Country codes separated by comma or semicolon (e.g., DEU,USA).
    #[arg(short, long)]
    countries: Option<String>,
    /// Chart type the pivot is prepared for.
    #[arg(long, value_enum, default_value_t = ChartArg::Line)]
    chart: ChartArg,
    /// Express the pivot as an index (base 100).
    #[arg(long, default_value_t = false)]
    index: bool,
    /// Base year for --index (defaults to the start of the range).
    #[arg(long, requires = "index")]
    base_year: Option<i32>,
    /// Number of countries in the ranking.
    #[arg(long)]
    top: Option<usize>,
    /// Break ranking ties by country code instead of input order.
    #[arg(long, default_value_t = false)]
    tie_by_code: bool,
    /// Locale for number formatting (e.g., en, de).
    #[arg(long)]
    locale: Option<String>,
    /// Print the pivot table.
    #[arg(long, default_value_t = false)]
    pivot: bool,
    /// Print the whole result as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Save the filtered long table (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_ascii_uppercase())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_date(s: &str) -> Option<(i32, i32)> {
    if let Some((a, b)) = s.split_once(':') {
        Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
    } else {
        let y = s.trim().parse().ok()?;
        Some((y, y))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Bounds(args) => cmd_bounds(args),
        Command::Show(args) => cmd_show(args),
    }
}

fn load_config(args: &InputArgs) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(p) => DashboardConfig::from_json_file(p)
            .with_context(|| format!("reading config {}", p.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(y) = args.extend_max_to {
        config.year_bounds = YearBoundsPolicy::ExtendMaxTo(y);
    }
    if let Some(n) = args.drop_recent {
        config.year_bounds = YearBoundsPolicy::DropRecent(n);
    }
    if args.metadata.is_some() {
        config.metadata_path = args.metadata.clone();
    }
    Ok(config)
}

fn open_session(args: &InputArgs, config: DashboardConfig) -> Result<Session> {
    let lookup = match &config.metadata_path {
        Some(p) => StaticCountryTable::from_json_file(p)
            .with_context(|| format!("reading metadata {}", p.display()))?,
        None => StaticCountryTable::embedded().context("embedded country metadata")?,
    };
    let raw = storage::load_wide_csv(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;
    Ok(Session::new(Arc::new(raw), Arc::new(lookup), config))
}

fn cmd_bounds(args: InputArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mut session = open_session(&args, config)?;
    let table = session.long_table()?;
    println!(
        "years {}..={}  countries={}  observations={}",
        table.bounds.min,
        table.bounds.max,
        table.countries.len(),
        table.observations.len()
    );
    Ok(())
}

fn cmd_show(args: ShowArgs) -> Result<()> {
    let mut config = load_config(&args.input)?;
    if let Some(n) = args.top {
        config.top_n = n;
    }
    if args.tie_by_code {
        config.tie_break = TieBreak::CountryCode;
    }
    if let Some(l) = &args.locale {
        config.locale = l.clone();
    }
    let locale = config.locale.clone();
    let mut session = open_session(&args.input, config)?;
    let bounds = session.year_bounds()?;
    let mut sel = session.default_selection()?;

    if let Some(d) = &args.date {
        let (from, to) = parse_date(d)
            .ok_or_else(|| anyhow::anyhow!("invalid --date, expected YYYY or YYYY:YYYY"))?;
        sel.from_year = from;
        sel.to_year = to;
    }
    check_selection(&sel, bounds)?;
    if let Some(c) = &args.countries {
        sel.countries = parse_list(c);
    }
    sel.chart = match args.chart {
        ChartArg::Line => ChartKind::Line,
        ChartArg::Bar => ChartKind::Bar,
    };
    if args.index {
        sel.index = IndexChoice::Rebased;
        sel.base_year = args.base_year;
    }

    let view = session.compute(&sel)?;
    let dash = match view {
        DashboardView::NoData { .. } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
            eprintln!("No data available for the selected criteria.");
            return Ok(());
        }
        DashboardView::Ready(ref d) => d,
    };

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&dash.observations, path)?,
            "json" => storage::save_json(&dash.observations, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", dash.observations.len(), path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_text(dash, &sel, args.pivot, &locale);
    }
    Ok(())
}

fn print_text(d: &Dashboard, sel: &gdp_dash::Selection, show_pivot: bool, locale: &str) {
    let (scale, scale_label) = d.scale;
    println!(
        "Indicators {}..={} (values in {})",
        sel.from_year,
        sel.to_year,
        unit_label(scale_label)
    );
    for r in &d.indicators {
        println!(
            "{:<5} last={:>12}  growth={:>9}  CAGR={:>8}",
            r.country_code,
            fmt_scaled(r.last, scale, locale),
            fmt_growth(r.growth, locale),
            fmt_pct(r.cagr_pct, locale),
        );
    }

    if show_pivot {
        println!();
        if !d.chart.rebased.is_empty() {
            println!("Index (base 100): {}", d.chart.rebased.join(", "));
        }
        let t = &d.chart.table;
        let header: String = t.countries.iter().map(|c| format!("{c:>14}")).collect();
        println!("{:<6}{header}", "Year");
        for (year, row) in t.years.iter().zip(&t.cells) {
            let cells: String = row
                .iter()
                .map(|v| match v {
                    Some(x) => format!("{:>14}", format_number(*x, 2, locale)),
                    None => format!("{:>14}", "n/a"),
                })
                .collect();
            println!("{year:<6}{cells}");
        }
    }

    println!();
    println!("Top {} in {}", d.top_countries.len(), d.ranking_year);
    for e in &d.top_countries {
        let v = fmt_scaled(Some(e.value), scale, locale);
        println!("{:>3}. {:<5} {v:>12}", e.rank, e.key);
    }
    println!();
    println!("Regions in {}", d.ranking_year);
    for e in &d.regions {
        let v = fmt_scaled(Some(e.value), scale, locale);
        println!("{:>3}. {:<16} {v:>12}", e.rank, e.key);
    }
}

fn unit_label(scale_label: &str) -> &str {
    if scale_label.is_empty() { "units" } else { scale_label }
}
