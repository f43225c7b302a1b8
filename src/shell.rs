//! Dashboard shell and command bar.
//!
//! Renders the "new tab" view (date header, task list, bookmarks) and runs
//! a line-oriented command bar over stdin. Commands feed back into the
//! Todoist client and the settings store; every client error is displayed
//! and the loop keeps going.

use crate::bookmarks::{self, Bookmark};
use crate::datetime::{due_instant, relative_date_time};
use crate::error::Result;
use crate::settings::{SettingKey, SettingsStore};
use crate::todoist::TodoistClient;
use crate::types::TodoistItem;
use chrono::{DateTime, FixedOffset, Local};
use std::collections::HashMap;
use std::io::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One parsed command-bar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Refresh,
    /// Close the n-th listed task (1-based).
    Done(usize),
    ShowFilter,
    SetFilter(String),
    ClearFilter,
    SetToken(String),
    ShowBackground,
    SetBackground(String),
    ClearBackground,
    AddBookmark { title: String, url: String },
    /// Remove the n-th bookmark (1-based).
    RemoveBookmark(usize),
    Help,
    Quit,
    Unknown(String),
}

/// Parse one command-bar line.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let head = trimmed.split_whitespace().next().unwrap_or_default();
    let rest = trimmed[head.len()..].trim();

    match head {
        "refresh" | "r" => Command::Refresh,
        "done" | "close" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Done(n),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "filter" => match rest {
            "" => Command::ShowFilter,
            "-" => Command::ClearFilter,
            expr => Command::SetFilter(expr.to_string()),
        },
        "token" => match rest {
            "" => Command::Unknown(trimmed.to_string()),
            token => Command::SetToken(token.to_string()),
        },
        "bg" => match rest {
            "" => Command::ShowBackground,
            "-" => Command::ClearBackground,
            url => Command::SetBackground(url.to_string()),
        },
        "bm" => parse_bookmark_command(trimmed, rest),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn parse_bookmark_command(full: &str, rest: &str) -> Command {
    let sub = rest.split_whitespace().next().unwrap_or_default();
    let args = rest[sub.len()..].trim();

    match sub {
        "add" => {
            let words: Vec<&str> = args.split_whitespace().collect();
            match words.split_last() {
                Some((url, title)) if !title.is_empty() => Command::AddBookmark {
                    title: title.join(" "),
                    url: (*url).to_string(),
                },
                _ => Command::Unknown(full.to_string()),
            }
        }
        "rm" => match args.parse::<usize>() {
            Ok(n) if n >= 1 => Command::RemoveBookmark(n),
            _ => Command::Unknown(full.to_string()),
        },
        _ => Command::Unknown(full.to_string()),
    }
}

/// Sort tasks for display: overdue first, then chronologically, tasks
/// without a resolvable due instant last.
pub fn sort_for_display(tasks: &mut [TodoistItem], now: DateTime<FixedOffset>) {
    let offset = *now.offset();
    tasks.sort_by_cached_key(|task| {
        let instant = task.due.as_ref().and_then(|due| due_instant(due, offset));
        let overdue = instant.map(|instant| instant < now).unwrap_or(false);
        (
            !overdue,
            instant.is_none(),
            instant.map(|instant| instant.timestamp()).unwrap_or(0),
        )
    });
}

/// The dashboard: fetched state plus the handles commands act on.
pub struct Dashboard {
    client: TodoistClient,
    settings: Arc<dyn SettingsStore>,
    tasks: Vec<TodoistItem>,
    project_names: HashMap<String, String>,
}

impl Dashboard {
    pub fn new(client: TodoistClient, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            client,
            settings,
            tasks: Vec::new(),
            project_names: HashMap::new(),
        }
    }

    /// Re-fetch tasks and projects and re-sort for display.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut tasks = self.client.get_tasks().await?;
        let projects = self.client.get_projects().await?;

        sort_for_display(&mut tasks, Local::now().fixed_offset());
        self.tasks = tasks;
        self.project_names = projects
            .into_iter()
            .map(|project| (project.id, project.name))
            .collect();
        Ok(())
    }

    /// Render the dashboard as text.
    pub fn render(&self, now: DateTime<FixedOffset>) -> String {
        let mut out = String::new();

        out.push_str(&format!("── {} ──\n", now.format("%A, %B %-d")));
        if let Some(url) = self.settings.get(SettingKey::BackgroundUrl) {
            out.push_str(&format!("background: {}\n", url));
        }

        out.push_str(&format!(
            "\nTasks ({}):\n",
            self.client.filter_query()
        ));
        if self.tasks.is_empty() {
            out.push_str("  nothing due\n");
        }
        for (index, task) in self.tasks.iter().enumerate() {
            out.push_str(&self.task_line(index, task, now));
            out.push('\n');
        }

        let bookmarks = bookmarks::load(self.settings.as_ref());
        if !bookmarks.is_empty() {
            out.push_str("\nBookmarks:\n");
            for (index, bookmark) in bookmarks.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {} - {}\n",
                    index + 1,
                    bookmark.title,
                    bookmark.url
                ));
            }
        }

        out
    }

    fn task_line(&self, index: usize, task: &TodoistItem, now: DateTime<FixedOffset>) -> String {
        let mut line = format!("  {}. ", index + 1);
        if let Some(priority) = task.priority {
            line.push_str(&format!("[{}] ", priority.label()));
        }
        line.push_str(&task.content);

        if let Some(due) = &task.due {
            let phrase = relative_date_time(due, now);
            if !phrase.is_empty() {
                line.push_str(&format!("  ({})", phrase));
            } else if !due.string.is_empty() {
                // Unparseable descriptor: fall back to the service's wording.
                line.push_str(&format!("  ({})", due.string));
            }
        }

        if let Some(name) = self.project_names.get(&task.project_id) {
            line.push_str(&format!("  #{}", name));
        }

        line
    }

    /// Run the shell: initial fetch, then read command-bar lines until quit.
    pub async fn run(mut self) -> Result<()> {
        if let Err(err) = self.refresh().await {
            println!("error: {err}");
        }
        self.render_now();
        prompt();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if self.dispatch(parse_command(&line)).await {
                break;
            }
            prompt();
        }

        Ok(())
    }

    /// Handle one command; returns true when the shell should exit.
    async fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Empty => {}
            Command::Quit => return true,
            Command::Help => print_help(),
            Command::Refresh => self.refresh_and_render().await,
            Command::Done(n) => self.close_listed_task(n).await,
            Command::ShowFilter => println!("filter: {}", self.client.filter_query()),
            Command::SetFilter(expr) => {
                if self.write_setting(SettingKey::Filter, Some(&expr)) {
                    self.refresh_and_render().await;
                }
            }
            Command::ClearFilter => {
                if self.write_setting(SettingKey::Filter, None) {
                    self.refresh_and_render().await;
                }
            }
            Command::SetToken(token) => {
                if self.write_setting(SettingKey::ApiToken, Some(&token)) {
                    self.refresh_and_render().await;
                }
            }
            Command::ShowBackground => match self.settings.get(SettingKey::BackgroundUrl) {
                Some(url) => println!("background: {url}"),
                None => println!("no background set"),
            },
            Command::SetBackground(url) => {
                if self.write_setting(SettingKey::BackgroundUrl, Some(&url)) {
                    self.render_now();
                }
            }
            Command::ClearBackground => {
                if self.write_setting(SettingKey::BackgroundUrl, None) {
                    self.render_now();
                }
            }
            Command::AddBookmark { title, url } => {
                let mut bookmarks = bookmarks::load(self.settings.as_ref());
                bookmarks.push(Bookmark { title, url });
                if self.save_bookmarks(&bookmarks) {
                    self.render_now();
                }
            }
            Command::RemoveBookmark(n) => {
                let mut bookmarks = bookmarks::load(self.settings.as_ref());
                if n > bookmarks.len() {
                    println!("no bookmark #{n}");
                } else {
                    bookmarks.remove(n - 1);
                    if self.save_bookmarks(&bookmarks) {
                        self.render_now();
                    }
                }
            }
            Command::Unknown(line) => {
                println!("unrecognized command: {line:?} (try \"help\")");
            }
        }
        false
    }

    async fn close_listed_task(&mut self, n: usize) {
        let Some(task) = self.tasks.get(n - 1) else {
            println!("no task #{n}");
            return;
        };
        let task_id = task.id.clone();
        let content = task.content.clone();

        match self.client.close_task(&task_id).await {
            Ok(_) => {
                println!("done: {content}");
                self.refresh_and_render().await;
            }
            Err(err) => println!("error: {err}"),
        }
    }

    async fn refresh_and_render(&mut self) {
        match self.refresh().await {
            Ok(()) => self.render_now(),
            Err(err) => println!("error: {err}"),
        }
    }

    fn render_now(&self) {
        print!("{}", self.render(Local::now().fixed_offset()));
    }

    fn write_setting(&self, key: SettingKey, value: Option<&str>) -> bool {
        let result = match value {
            Some(value) => self.settings.set(key, value),
            None => self.settings.remove(key),
        };
        if let Err(err) = result {
            println!("error: {err}");
            return false;
        }
        true
    }

    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> bool {
        if let Err(err) = bookmarks::save(self.settings.as_ref(), bookmarks) {
            println!("error: {err}");
            return false;
        }
        true
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!(
        "commands:\n  \
         refresh            re-fetch tasks and projects\n  \
         done <n>           close the n-th listed task\n  \
         filter [expr|-]    show, set, or clear the task filter\n  \
         token <value>      store the Todoist API token\n  \
         bg [url|-]         show, set, or clear the background image URL\n  \
         bm add <title> <url>\n  \
         bm rm <n>          manage bookmarks\n  \
         quit"
    );
}
