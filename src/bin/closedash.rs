use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use closedash::metrics::TOP_PERIODS;
use closedash::records::{PLATFORM_A_LABEL, PLATFORM_B_LABEL};
use closedash::report::{render_text, ReportInput};
use closedash::{
    Dashboard, Database, DateRange, GoalConfig, RatingRecord, RecordFilter, ShiftRecord, Workbook,
};

#[derive(Parser)]
#[command(name = "closedash", about = "Close-shift revenue and rating dashboard")]
struct Cli {
    /// Data store path (default: ~/.closedash/closedash.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Revenue goal per close for a location, e.g. Amiens=350 (repeatable)
    #[arg(long = "goal", value_name = "LOCATION=AMOUNT")]
    goals: Vec<String>,

    /// Minimum star rating goal on both platforms
    #[arg(long)]
    min_rating: Option<f64>,

    /// Start from an empty revenue goal map instead of the built-in goals
    #[arg(long)]
    no_default_goals: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Date range (e.g. 2025-01-01..2025-01-31, 2025-Q1, 2025-03, 30d, ytd).
    /// Defaults to every date in the data.
    #[arg(long)]
    range: Option<String>,
    /// Location, or "all"
    #[arg(long)]
    location: Option<String>,
    /// Brand (rating views only)
    #[arg(long)]
    brand: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty data store
    Init,
    /// Replace the store contents with a workbook file
    Import {
        /// Workbook JSON file (as written by `export`)
        path: PathBuf,
    },
    /// Write the store contents to a workbook file
    Export {
        /// Output path
        path: PathBuf,
        /// Write two CSV files (<stem>_shifts.csv, <stem>_ratings.csv) instead of JSON
        #[arg(long)]
        csv: bool,
    },
    /// Show store status
    Status,
    /// Show the goal configuration in effect
    Goals,
    /// Revenue, orders, basket and goal attainment for closes
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Best close windows by mean hourly revenue
    Top {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Per-date totals for each close window
    Pivot {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Hourly revenue per date and close window
    Heatmap {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Close rows, sorted by date, location and window
    Details {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Average ratings and rating goal attainment
    Ratings {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Average ratings per location and brand
    Brands {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Ratings per platform over time
    Timeline {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Add a row
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },
    /// Show the latest rows of both tables
    Recent {
        /// Number of rows per table
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Render a text report
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        /// Report title
        #[arg(long, default_value = "Close report")]
        title: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AddTarget {
    /// Add a close shift
    Shift {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: String,
        /// Close window, e.g. "23:00 - 00:00"
        #[arg(long)]
        period: String,
        #[arg(long)]
        orders: u32,
        /// Revenue (EUR)
        #[arg(long)]
        revenue: f64,
    },
    /// Add a rating row
    Rating {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        brand: String,
        /// Uber Eats rating (0-5)
        #[arg(long)]
        platform_a: f64,
        /// Deliveroo rating (0-5)
        #[arg(long)]
        platform_b: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let goals = build_goals(&cli)?;
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => Database::default_path()?,
    };

    match cli.command {
        Commands::Init => {
            Database::create_at(&db_path).await?;
            println!("Data store ready at {}", db_path.display());
        }
        Commands::Import { path } => {
            let bytes = std::fs::read(&path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
            let workbook = Workbook::from_bytes(&bytes)?;
            let db = Database::create_at(&db_path).await?;
            let dash = Dashboard::from_workbook(workbook, goals);
            dash.save(&db).await?;
            println!(
                "Imported {} closes and {} rating rows into {}",
                dash.shifts().len(),
                dash.ratings().len(),
                db_path.display()
            );
        }
        Commands::Export { path, csv } => {
            let dash = open_session(&db_path, goals).await?;
            let workbook = dash.workbook();
            if csv {
                let (shifts_path, ratings_path) = csv_paths(&path);
                std::fs::write(&shifts_path, workbook.shifts_csv())?;
                std::fs::write(&ratings_path, workbook.ratings_csv())?;
                println!(
                    "Wrote {} and {}",
                    shifts_path.display(),
                    ratings_path.display()
                );
            } else {
                std::fs::write(&path, workbook.to_bytes()?)?;
                println!("Wrote {}", path.display());
            }
        }
        Commands::Status => {
            let db = open_store(&db_path).await?;
            let (shifts, ratings) = db.counts().await?;
            let dash = Dashboard::load(&db, goals).await?;
            println!("Data Store Status");
            println!("  Path:      {}", db_path.display());
            println!("  Closes:    {shifts}");
            println!("  Ratings:   {ratings}");
            println!("  Locations: {}", dash.locations().join(", "));
            match dash.full_range() {
                Some(r) => println!("  Dates:     {r}"),
                None => println!("  Dates:     none"),
            }
        }
        Commands::Goals => {
            println!("Revenue goals (EUR per close):");
            if goals.revenue_goals().is_empty() {
                println!("  none");
            }
            for (location, goal) in goals.revenue_goals() {
                println!("  {location}: {goal}");
            }
            println!(
                "Rating goal: {} minimum ({PLATFORM_A_LABEL} and {PLATFORM_B_LABEL})",
                goals.min_rating_goal()
            );
        }
        Commands::Summary { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let s = dash.shift_summary(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else if s.row_count == 0 {
                println!("No data for the selected filters.");
            } else {
                println!("Closes: {}", location_label(&f));
                println!("  Total revenue (EUR):   {}", opt(s.total_revenue, 0));
                println!(
                    "  Orders:                {}",
                    s.total_orders.unwrap_or_default()
                );
                println!("  Average basket (EUR):  {}", opt(s.average_basket, 2));
                println!(
                    "  Revenue per hour:      {}",
                    opt(s.average_revenue_per_hour, 2)
                );
                if let Some(goal) = &s.revenue_goal {
                    println!("  Goal {} EUR per close ({}):", goal.goal, goal.location);
                    println!(
                        "    Closes >= goal:      {} / {} ({:.1} %)",
                        goal.nb_ok, goal.nb_total, goal.pct_ok
                    );
                }
            }
        }
        Commands::Top { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let rows = dash.top_periods(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No data for the selected filters.");
            } else {
                println!("Top {TOP_PERIODS} close windows by revenue per hour");
                for (i, r) in rows.iter().enumerate() {
                    println!(
                        "  {:>2}. {} {} | {} EUR/h | {:.2} EUR | {:.1} orders ({} closes)",
                        i + 1,
                        r.location,
                        r.period_label,
                        opt(r.mean_revenue_per_hour, 2),
                        r.mean_revenue,
                        r.mean_order_count,
                        r.shift_count
                    );
                }
            }
        }
        Commands::Pivot { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let rows = dash.revenue_pivot(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No data for the selected filters.");
            } else {
                for r in &rows {
                    println!(
                        "{} {} {} | {:.2} EUR | {} orders | {} EUR/h | {} orders/h",
                        r.date,
                        r.location,
                        r.period_label,
                        r.revenue,
                        r.order_count,
                        opt(r.revenue_per_hour, 2),
                        opt(r.orders_per_hour, 2)
                    );
                }
            }
        }
        Commands::Heatmap { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let cells = dash.revenue_heatmap(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&cells)?);
            } else if cells.is_empty() {
                println!("No data for the selected filters.");
            } else {
                for c in &cells {
                    println!(
                        "{} {} {} | {} EUR/h",
                        c.date,
                        c.location,
                        c.period_label,
                        opt(c.revenue_per_hour, 2)
                    );
                }
            }
        }
        Commands::Details { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let rows = dash.shift_details(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No data for the selected filters.");
            } else {
                for s in &rows {
                    println!(
                        "{} {} {} | {} orders | {:.2} EUR | {} h | {} EUR/h",
                        s.record.date,
                        s.record.location,
                        s.record.period_label,
                        s.record.order_count,
                        s.record.revenue,
                        opt(s.duration_hours, 2),
                        opt(s.revenue_per_hour, 2)
                    );
                }
            }
        }
        Commands::Ratings { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let s = dash.rating_summary(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else if s.row_count == 0 {
                println!("No data for the selected filters.");
            } else {
                println!("Ratings: {}", location_label(&f));
                println!("  {PLATFORM_A_LABEL} average: {}", opt(s.mean_platform_a, 2));
                println!("  {PLATFORM_B_LABEL} average: {}", opt(s.mean_platform_b, 2));
                println!(
                    "  Rows >= {} on both: {} / {} ({:.1} %)",
                    s.goal.min_rating, s.goal.nb_ok, s.goal.nb_total, s.goal.pct_ok
                );
                println!("  Brands: {}", dash.brands(&f).join(", "));
            }
        }
        Commands::Brands { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let rows = dash.brand_performance(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No data for the selected filters.");
            } else {
                for b in &rows {
                    println!(
                        "{} {} | {PLATFORM_A_LABEL} {:.2} | {PLATFORM_B_LABEL} {:.2} ({} rows)",
                        b.location, b.brand, b.mean_platform_a, b.mean_platform_b, b.row_count
                    );
                }
            }
        }
        Commands::Timeline { filter } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let points = dash.rating_timeline(&f);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else if points.is_empty() {
                println!("No data for the selected filters.");
            } else {
                for p in &points {
                    println!(
                        "{} {} {} | {} {:.1}",
                        p.date, p.location, p.brand, p.platform, p.rating
                    );
                }
            }
        }
        Commands::Add { target } => {
            let db = open_store(&db_path).await?;
            let mut dash = Dashboard::load(&db, goals).await?;
            handle_add(&db, &mut dash, target).await?;
        }
        Commands::Recent { limit } => {
            let dash = open_session(&db_path, goals).await?;
            println!("Latest closes");
            for s in closedash::metrics::recent_shifts(dash.shifts(), limit) {
                println!(
                    "  {} {} {} | {} orders | {:.2} EUR",
                    s.record.date,
                    s.record.location,
                    s.record.period_label,
                    s.record.order_count,
                    s.record.revenue
                );
            }
            println!("Latest ratings");
            for r in closedash::metrics::recent_ratings(dash.ratings(), limit) {
                println!(
                    "  {} {} {} | {:.1} / {:.1}",
                    r.date, r.location, r.brand, r.rating_platform_a, r.rating_platform_b
                );
            }
        }
        Commands::Report { filter, title, out } => {
            let dash = open_session(&db_path, goals).await?;
            let f = build_filter(&dash, &filter)?;
            let shifts = dash.shift_summary(&f);
            let ratings = dash.rating_summary(&f);
            let text = render_text(&ReportInput {
                title: &title,
                location: f.selected_location(),
                range: f.selected_range(),
                shifts: &shifts,
                ratings: &ratings,
            });
            match out {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{text}"),
            }
        }
    }

    Ok(())
}

async fn handle_add(db: &Database, dash: &mut Dashboard, target: AddTarget) -> anyhow::Result<()> {
    match target {
        AddTarget::Shift {
            date,
            location,
            period,
            orders,
            revenue,
        } => {
            let record = ShiftRecord {
                date: parse_date(&date)?,
                location,
                period_label: period,
                order_count: orders,
                revenue,
            };
            let added = dash.append_shift(record)?.clone();
            db.append_shift(added.record.clone()).await?;
            println!(
                "Added close {} {} {} ({} EUR/h)",
                added.record.date,
                added.record.location,
                added.record.period_label,
                opt(added.revenue_per_hour, 2)
            );
        }
        AddTarget::Rating {
            date,
            location,
            brand,
            platform_a,
            platform_b,
        } => {
            let record = RatingRecord {
                date: parse_date(&date)?,
                location,
                brand,
                rating_platform_a: platform_a,
                rating_platform_b: platform_b,
            };
            let added = dash.append_rating(record)?.clone();
            db.append_rating(added.clone()).await?;
            let verdict = if added.meets_goal(dash.goals().min_rating_goal()) {
                "meets"
            } else {
                "below"
            };
            println!(
                "Added rating {} {} {} ({verdict} goal)",
                added.date, added.location, added.brand
            );
        }
    }
    Ok(())
}

fn build_goals(cli: &Cli) -> anyhow::Result<GoalConfig> {
    let mut goals = if cli.no_default_goals {
        GoalConfig::empty(closedash::goals::DEFAULT_MIN_RATING_GOAL)?
    } else {
        GoalConfig::default()
    };
    if let Some(min) = cli.min_rating {
        goals.set_min_rating_goal(min)?;
    }
    for spec in &cli.goals {
        goals.apply_override(spec)?;
    }
    Ok(goals)
}

async fn open_store(path: &Path) -> anyhow::Result<Database> {
    match Database::open_existing(path).await {
        Ok(db) => Ok(db),
        Err(closedash::Error::SourceNotFound(p)) => Err(anyhow::anyhow!(
            "data store not found: {p}\n\
             Create it with `closedash init`, load a workbook with `closedash import <file>`, \
             or point --db at an existing store."
        )),
        Err(e) => Err(e.into()),
    }
}

async fn open_session(path: &Path, goals: GoalConfig) -> anyhow::Result<Dashboard> {
    let db = open_store(path).await?;
    Ok(Dashboard::load(&db, goals).await?)
}

fn build_filter(dash: &Dashboard, args: &FilterArgs) -> anyhow::Result<RecordFilter> {
    let today = chrono::Local::now().date_naive();
    let range = match args.range.as_deref() {
        Some(s) => Some(DateRange::parse(s, today)?),
        None => dash.full_range(),
    };
    let location = args
        .location
        .as_deref()
        .filter(|l| !l.eq_ignore_ascii_case("all"));

    let mut filter = RecordFilter::new()
        .location(location)
        .brand(args.brand.as_deref());
    if let Some(r) = range {
        filter = filter.range(r);
    }
    Ok(filter)
}

fn parse_date(s: &str) -> anyhow::Result<chrono::NaiveDate> {
    closedash::date_util::parse_iso_date(s)
        .ok_or_else(|| anyhow::anyhow!("invalid date {s:?}, expected YYYY-MM-DD"))
}

fn csv_paths(path: &Path) -> (PathBuf, PathBuf) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "closedash".to_string());
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    (
        dir.join(format!("{stem}_shifts.csv")),
        dir.join(format!("{stem}_ratings.csv")),
    )
}

fn location_label(filter: &RecordFilter) -> String {
    let location = filter.selected_location().unwrap_or("all locations");
    match filter.selected_range() {
        Some(r) => format!("{location}, {r}"),
        None => location.to_string(),
    }
}

fn opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{v:.decimals$}"))
}
