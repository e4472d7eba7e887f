use anyhow::{bail, Result};
use clap::Parser;
use todo_core::{Filter, Row, TodoClient, TodoView, Transport, UreqTransport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=warn,todo_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let client = TodoClient::new(&cli.base_url);
    let mut transport = UreqTransport::new();

    if let Commands::Count = cli.command {
        let response = transport.execute(client.build_count_todos())?;
        println!("{}", client.parse_count_todos(response)?);
        return Ok(());
    }

    let mut view = TodoView::new(client);
    let mount = view.mount();
    view.drive(&mut transport, mount);
    settled(&view)?;

    let outgoing = match cli.command {
        Commands::List { completed } => {
            if completed {
                view.set_filter(Filter::Complete);
            }
            print_rows(&view.rows());
            return Ok(());
        }
        Commands::Add { text } => {
            view.set_draft(text.join(" "));
            match view.submit_draft()? {
                Some(outgoing) => outgoing,
                None => bail!("todo text must not be empty"),
            }
        }
        Commands::Toggle { id } => match view.toggle(id)? {
            Some(outgoing) => outgoing,
            None => bail!("no todo with id {id}"),
        },
        Commands::Edit { id, text } => {
            if !view.begin_edit(id) {
                bail!("no todo with id {id}");
            }
            view.set_edit_text(text.join(" "));
            match view.save_edit()? {
                Some(outgoing) => outgoing,
                None => bail!("no todo with id {id}"),
            }
        }
        Commands::Delete { id } => view.delete(id),
        Commands::Count => return Ok(()),
    };

    view.drive(&mut transport, outgoing);
    settled(&view)?;

    for (filter, title) in [(Filter::Incomplete, "Open"), (Filter::Complete, "Done")] {
        view.set_filter(filter);
        println!("{title}:");
        print_rows(&view.rows());
    }
    Ok(())
}

fn settled(view: &TodoView) -> Result<()> {
    if let Some(error) = view.last_error() {
        bail!("request failed: {error}");
    }
    Ok(())
}

fn print_rows(rows: &[Row]) {
    if rows.is_empty() {
        println!("  (nothing here)");
    }
    for row in rows {
        println!("{}", format_row(row));
    }
}

fn format_row(row: &Row) -> String {
    let mark = if row.completed { 'x' } else { ' ' };
    format!("{:>4} [{mark}] {}", row.id, row.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_show_id_and_mark() {
        let row = Row {
            id: 7,
            text: "walk dog".to_string(),
            completed: true,
            editing: None,
        };
        assert_eq!(format_row(&row), "   7 [x] walk dog");
    }
}
