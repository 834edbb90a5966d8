mod cli;

use clap::Parser;
use cli::Cli;
use skillscan::orchestrator::{self, CancelToken, NoopSink, ProgressSink, ScanEvent};
use skillscan::output::{self, OutputFormat};
use skillscan::{config::Config, discover, finding::ScanReport, patterns};

fn main() {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    });

    let patterns = patterns::all();

    let report: ScanReport = if cli.auto {
        let targets = discover::installed_skills(cli.project.as_deref());
        if targets.is_empty() {
            eprintln!(
                "No installed agent skills found. Provide a path directly, or use --project to include project-level skills."
            );
            std::process::exit(0);
        }

        // Progress goes to stderr so it never corrupts a report piped from
        // stdout; JSON and file output run quiet.
        let sink: Box<dyn ProgressSink> = if cli.json || cli.output.is_some() {
            Box::new(NoopSink)
        } else {
            Box::new(StderrProgress)
        };

        orchestrator::scan_all(&targets, patterns, &config, sink.as_ref(), &CancelToken::new())
    } else {
        // clap guarantees a path when --auto is absent.
        let Some(path) = cli.path.as_deref() else {
            eprintln!("Error: path required, or use --auto");
            std::process::exit(2);
        };

        orchestrator::scan_path(path, patterns, &config, &NoopSink).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(2);
        })
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let rendered = output::format_report(&report, cli.min_severity, format);

    if let Some(out_path) = &cli.output {
        output::write_report(&rendered, out_path).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(2);
        });
        eprintln!("Report written to {}", out_path.display());
    } else {
        print!("{rendered}");
    }

    // Exit policy: nonzero when any rendered finding reaches the fail
    // threshold, or when any package could not be scanned. The threshold
    // never drops below the rendering floor; hidden findings cannot fail
    // the run.
    let fail_on = cli.fail_on.unwrap_or(config.policy.fail_on);
    let threshold = cli.min_severity.map_or(fail_on, |floor| floor.max(fail_on));
    let failed = report.findings().any(|f| f.severity >= threshold) || report.has_errors();

    std::process::exit(if failed { 1 } else { 0 });
}

/// Renders incremental progress for interactive auto scans.
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn on_event(&self, event: ScanEvent) {
        match event {
            ScanEvent::PackageStarted {
                package,
                index,
                total,
            } => eprintln!("Scanning {package} ({index}/{total})..."),
            ScanEvent::PackageFailed { package, error } => {
                eprintln!("  {package}: scan failed: {error}");
            }
            _ => {}
        }
    }
}
