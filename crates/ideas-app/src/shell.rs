//! Line-oriented interactive loop.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use ideas_common::IdeasError;

use crate::app::{render_ideas, App, Reply};
use crate::commands;

const PROMPT: &str = "ideas> ";

/// Report state transitions as they happen, independent of which command
/// caused them.
pub fn spawn_watchers(app: &App) -> Vec<JoinHandle<()>> {
    let mut logged_in = app.session.subscribe_logged_in();
    let mut ideas = app.ideas.subscribe();

    let session_task = tokio::spawn(async move {
        while logged_in.changed().await.is_ok() {
            let now = *logged_in.borrow_and_update();
            info!(logged_in = now, "session state changed");
        }
    });
    let ideas_task = tokio::spawn(async move {
        while ideas.changed().await.is_ok() {
            let count = ideas.borrow_and_update().len();
            debug!(count, "idea list changed");
        }
    });
    vec![session_task, ideas_task]
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(app: &App) -> Result<(), IdeasError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    write(&mut stdout, "type `help` for commands\n").await?;
    loop {
        write(&mut stdout, PROMPT).await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                write(&mut stdout, &format!("{usage}\n")).await?;
                continue;
            }
        };

        match app.execute(command).await {
            Ok(Reply::Text(text)) => write(&mut stdout, &format!("{text}\n")).await?,
            Ok(Reply::Quit) => break,
            Err(e) => write(&mut stdout, &format!("error: {e}\n")).await?,
        }
    }
    Ok(())
}

/// Load the first page so `list` has something to show.
pub async fn preload(app: &App) {
    match app.ideas.init().await {
        Ok(()) => println!("{}", render_ideas(&app.ideas.current())),
        Err(e) => println!("could not load ideas yet: {e}"),
    }
}

async fn write(stdout: &mut tokio::io::Stdout, text: &str) -> Result<(), IdeasError> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
