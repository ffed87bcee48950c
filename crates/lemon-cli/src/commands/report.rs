use std::sync::Arc;

use lemon_core::{Report, ReportView};
use lemon_reports::{PollEvent, PollSchedule, Poller, ReportError, stop_pair, watch_list};

use crate::cli::subcommands::ReportCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::output::report_view::{ReportRow, render_text, status_line};
use crate::progress::Spinner;

/// Handle `lemonlens report <subcommand>`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reports = &ctx.reports;
    match action {
        ReportCommands::Create(args) => {
            let report = {
                let _spinner = Spinner::start("Requesting report…");
                reports.create_report(&args.to_input()).await?
            };
            if args.watch {
                return follow_from(ctx, flags, report, Poller::resume_from).await;
            }
            show(&report, flags.format)
        }
        ReportCommands::List(args) if args.watch => watch_reports(ctx, flags.format).await,
        ReportCommands::List(_) => {
            let list = reports.list_reports().await?;
            print_list(&list, flags.format)
        }
        ReportCommands::Get(args) => {
            let report = reports.get_report(&args.id).await?;
            if args.watch {
                return follow_from(ctx, flags, report, Poller::resume_from).await;
            }
            show(&report, flags.format)
        }
        ReportCommands::Retry(args) => {
            let report = reports.retry_report(&args.id).await?;
            if args.watch {
                return follow_from(ctx, flags, report, Poller::after_retry).await;
            }
            show(&report, flags.format)
        }
        ReportCommands::Watch(args) => {
            follow(ctx, flags, &args.id, Poller::new(ctx.poll_schedule())).await
        }
    }
}

fn show(report: &Report, format: OutputFormat) -> anyhow::Result<()> {
    let view = ReportView::for_report(report);
    if format == OutputFormat::Table {
        println!("{}", render_text(&view));
        return Ok(());
    }
    output(&view, format)
}

fn print_list(list: &[Report], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Table {
        let rows = list.iter().map(ReportRow::from).collect::<Vec<_>>();
        return output(&rows, format);
    }
    output(&list, format)
}

async fn follow_from(
    ctx: &AppContext,
    flags: &GlobalFlags,
    report: Report,
    start: fn(PollSchedule, Report) -> Poller,
) -> anyhow::Result<()> {
    let Some(id) = report.key() else {
        anyhow::bail!("the server returned a report without an id");
    };
    let poller = start(ctx.poll_schedule(), report);
    follow(ctx, flags, &id, poller).await
}

/// Poll one report until it finishes, disappears, or Ctrl-C.
///
/// Table output keeps a spinner and prints the final view; json and raw
/// print one view per observation, one per line.
async fn follow(ctx: &AppContext, flags: &GlobalFlags, id: &str, poller: Poller) -> anyhow::Result<()> {
    let format = flags.format;
    let spinner = Spinner::start(format!("Waiting for report {id}…"));
    let (handle, signal) = stop_pair();
    let mut print_error = None;

    let poller = {
        let on_event = |event: &PollEvent| {
            let printed = match event {
                PollEvent::Updated { report, tier } if format == OutputFormat::Table => {
                    spinner.update(format!("{} [{}]", status_line(report), tier.as_str()));
                    Ok(())
                }
                PollEvent::Updated { report, .. } => {
                    output(&ReportView::for_report(report), OutputFormat::Raw)
                }
                PollEvent::Missing if format != OutputFormat::Table => {
                    output(&ReportView::NotFound, OutputFormat::Raw)
                }
                PollEvent::Failed(error) => {
                    spinner.update(format!("retrying after error: {error}"));
                    Ok(())
                }
                PollEvent::Missing | PollEvent::Cancelled => Ok(()),
            };
            if let Err(error) = printed {
                print_error.get_or_insert(error);
            }
        };
        let run = poller.run(|| ctx.reports.lookup_report(id), signal, on_event);
        tokio::pin!(run);
        tokio::select! {
            poller = &mut run => poller,
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
                run.await
            }
        }
    };

    if poller.is_missing() {
        spinner.fail("report not found");
        anyhow::bail!("report {id} not found");
    }
    drop(spinner);
    if let Some(error) = print_error {
        return Err(error);
    }
    if format == OutputFormat::Table
        && let Some(report) = poller.latest()
    {
        println!("{}", render_text(&ReportView::for_report(report)));
    }
    Ok(())
}

/// `report list --watch`: reprint the list on every refresh until Ctrl-C.
async fn watch_reports(ctx: &AppContext, format: OutputFormat) -> anyhow::Result<()> {
    let (handle, signal) = stop_pair();
    let mut print_error = None;
    {
        let on_update = |update: &Result<Arc<Vec<Report>>, ReportError>| match update {
            Ok(list) => {
                if format == OutputFormat::Table {
                    println!("\n{}", chrono::Local::now().format("%H:%M:%S"));
                }
                if let Err(error) = print_list(list, format) {
                    print_error.get_or_insert(error);
                }
            }
            Err(error) => tracing::warn!(%error, "report list refresh failed"),
        };
        let watch = watch_list(&ctx.reports, ctx.config.polling.list(), signal, on_update);
        tokio::pin!(watch);
        tokio::select! {
            () = &mut watch => {}
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
                watch.await;
            }
        }
    }
    print_error.map_or(Ok(()), Err)
}
