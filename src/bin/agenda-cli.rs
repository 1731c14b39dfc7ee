#![forbid(unsafe_code)]
use agenda::{
    io,
    mirror::{JournalMirror, NoopMirror, RemoteMirror},
    model::DEFAULT_TIME_ZONE,
    recurrence::{DayCode, Frequency, RecurrenceRule, Terminator},
    scheduler::{ConflictReport, Outcome, ScheduleOptions, Scheduler},
    session::Session,
    storage::JsonStorage,
};
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI d'agenda personnel avec détection de conflits
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'agenda
    #[arg(long, global = true, default_value = "calendar.json")]
    calendar: String,

    /// Journal JSON Lines servant de miroir distant (optionnel)
    #[arg(long, global = true)]
    mirror_journal: Option<String>,

    /// Écart minimal entre deux événements, en minutes
    #[arg(long, global = true, default_value_t = agenda::scheduler::MIN_GAP_MINUTES)]
    min_gap: u32,

    /// Fenêtre de suggestion de dates libres, en jours
    #[arg(long, global = true, default_value_t = agenda::scheduler::DEFAULT_WINDOW_DAYS)]
    window_days: u32,

    /// Libellé de fuseau posé sur les nouveaux événements
    #[arg(long, global = true, default_value = DEFAULT_TIME_ZONE)]
    time_zone: String,

    #[command(subcommand)]
    cmd: Commands,
}

/// Description d'une récurrence : soit `--rrule`, soit les champs séparés.
#[derive(Args, Debug)]
struct RuleArgs {
    /// Règle textuelle `RRULE:FREQ=...;INTERVAL=...;COUNT=...`
    #[arg(long, conflicts_with_all = ["freq", "count", "until", "byday"])]
    rrule: Option<String>,
    /// DAILY | WEEKLY | MONTHLY | YEARLY
    #[arg(long)]
    freq: Option<String>,
    #[arg(long, default_value_t = 1)]
    interval: u32,
    #[arg(long, conflicts_with = "until")]
    count: Option<u32>,
    /// Date de fin incluse (YYYY-MM-DD)
    #[arg(long)]
    until: Option<String>,
    /// Jours "MO,WE,FR" (informatif)
    #[arg(long)]
    byday: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un événement ponctuel
    Add {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        summary: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
    },

    /// Ajouter un événement récurrent (tout ou rien)
    AddRecurring {
        /// Date de la première occurrence (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Vérifier un créneau sans l'ajouter
    Check {
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Lister les dates libres pour un créneau horaire
    Free {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Date de départ de la recherche (défaut : aujourd'hui)
        #[arg(long)]
        from: Option<String>,
    },

    /// Lister et optionnellement exporter
    List {
        /// Limiter à une date
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Importer des événements depuis un CSV (`date,summary,start,end`)
    Import {
        #[arg(long)]
        csv: String,
    },

    /// Afficher la forme RRULE d'une récurrence
    Rule {
        #[command(flatten)]
        rule: RuleArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let options = ScheduleOptions {
        min_gap_minutes: cli.min_gap,
        window_days: cli.window_days,
        time_zone: cli.time_zone.clone(),
    };
    let mirror: Box<dyn RemoteMirror> = match &cli.mirror_journal {
        Some(path) => Box::new(JournalMirror::new(path)),
        None => Box::new(NoopMirror),
    };

    let storage = JsonStorage::open(&cli.calendar)?;
    let mut session = Session::open(&storage, mirror.as_ref(), options)?;
    let today = Local::now().date_naive();

    let code = match cli.cmd {
        Commands::Add {
            date,
            summary,
            start,
            end,
        } => {
            let date = io::parse_date(&date)?;
            let (start, end) = (io::parse_clock(&start)?, io::parse_clock(&end)?);
            match session.add_single(date, &summary, start, end)? {
                Outcome::Committed(_) => {
                    println!("Event added: {summary} on {date} {start}-{end}");
                    0
                }
                Outcome::Rejected(report) => {
                    report_conflict(session.scheduler(), &report, start, end, today)?;
                    2
                }
            }
        }
        Commands::AddRecurring {
            start_date,
            summary,
            start,
            end,
            rule,
        } => {
            let start_date = io::parse_date(&start_date)?;
            let (start, end) = (io::parse_clock(&start)?, io::parse_clock(&end)?);
            let rule = build_rule(&rule)?;
            match session.add_recurring(start_date, &summary, start, end, &rule)? {
                Outcome::Committed(events) => {
                    println!(
                        "Recurring event added: {summary}, {} occurrence(s) ({rule})",
                        events.len()
                    );
                    0
                }
                Outcome::Rejected(report) => {
                    report_conflict(session.scheduler(), &report, start, end, today)?;
                    2
                }
            }
        }
        Commands::Check { date, start, end } => {
            let date = io::parse_date(&date)?;
            let (start, end) = (io::parse_clock(&start)?, io::parse_clock(&end)?);
            let scheduler = session.scheduler();
            let report = scheduler.classify(date, start, end)?;
            if report.is_conflict() {
                report_conflict(scheduler, &report, start, end, today)?;
                2
            } else {
                println!("OK: no conflicts");
                0
            }
        }
        Commands::Free { start, end, from } => {
            let (start, end) = (io::parse_clock(&start)?, io::parse_clock(&end)?);
            let reference = match from {
                Some(raw) => io::parse_date(&raw)?,
                None => today,
            };
            for date in session.scheduler().find_free(start, end, reference)? {
                println!("{date}");
            }
            0
        }
        Commands::List {
            date,
            out_json,
            out_csv,
        } => {
            let scheduler = session.scheduler();
            if let Some(path) = out_json {
                io::export_calendar_json(path, scheduler.calendar())?;
            }
            if let Some(path) = out_csv {
                io::export_events_csv(path, scheduler.calendar())?;
            }
            let filter = date.as_deref().map(io::parse_date).transpose()?;
            // impression compacte
            for day in &scheduler.calendar().days {
                if filter.is_some_and(|d| d != day.date) {
                    continue;
                }
                for ev in scheduler.events_on(day.date) {
                    println!(
                        "{} | {} → {} | {}",
                        day.date,
                        ev.start.date_time.format("%H:%M"),
                        ev.end.date_time.format("%H:%M"),
                        ev.summary
                    );
                }
            }
            0
        }
        Commands::Import { csv } => {
            let requests = io::import_events_csv(csv)?;
            let (mut added, mut rejected) = (0usize, 0usize);
            for req in requests {
                match session.add_single(req.date, &req.summary, req.start, req.end)? {
                    Outcome::Committed(events) => added += events.len(),
                    Outcome::Rejected(report) => {
                        eprintln!("Skipped {} on {}: {report}", req.summary, req.date);
                        rejected += 1;
                    }
                }
            }
            println!("Imported {added} event(s), skipped {rejected}");
            // Code 2 = WARNING/INCOMPLETE
            if rejected > 0 {
                2
            } else {
                0
            }
        }
        Commands::Rule { rule } => {
            println!("{}", build_rule(&rule)?);
            0
        }
    };

    std::process::exit(code);
}

fn build_rule(args: &RuleArgs) -> Result<RecurrenceRule> {
    if let Some(raw) = &args.rrule {
        return raw.parse().context("parsing --rrule");
    }
    let Some(freq) = &args.freq else {
        bail!("either --rrule or --freq is required");
    };
    let frequency: Frequency = freq.parse()?;
    let terminator = match (args.count, &args.until) {
        (Some(n), _) => Terminator::Count(n),
        (None, Some(until)) => Terminator::Until(io::parse_date(until)?),
        (None, None) => bail!("a recurrence needs --count or --until"),
    };
    let by_day = match &args.byday {
        Some(raw) => DayCode::parse_list(raw)?,
        None => Vec::new(),
    };
    Ok(RecurrenceRule::new(frequency, args.interval, terminator, by_day)?)
}

fn report_conflict(
    scheduler: &Scheduler,
    report: &ConflictReport,
    start: NaiveTime,
    end: NaiveTime,
    today: NaiveDate,
) -> Result<()> {
    eprintln!("Conflict detected: {report}");
    let free = scheduler.find_free(start, end, today)?;
    if free.is_empty() {
        eprintln!(
            "No free dates available for {start}-{end} within the next {} days.",
            scheduler.options().window_days
        );
    } else {
        let dates: Vec<String> = free.iter().map(ToString::to_string).collect();
        eprintln!("Suggested free dates for {start}-{end}: {}", dates.join(", "));
    }
    Ok(())
}
