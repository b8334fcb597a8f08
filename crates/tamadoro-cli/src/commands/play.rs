//! Interactive session.
//!
//! Reads one command per line from stdin while the mood ticker refreshes the
//! pet's message in the background. Both are driven from a single task, so
//! the session never sees two commands at once. Nothing is saved on exit.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tamadoro_core::error::Result as CoreResult;
use tamadoro_core::{
    AssignmentId, AssignmentPatch, AssignmentStatus, Config, Event, GoalId, ItemId, MonthGrid,
    MoodTicker, Session, View,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::load_config;

const HELP: &str = "\
Commands:
  task <YYYY-MM-DD> [points] <name...>   add an assignment
  status <id> todo|doing|done            change an assignment's status
  rename <id> <name...>                  rename an assignment
  rm-task <id>                           delete an assignment
  goal [points] <name...>                add a daily goal
  check <id> / uncheck <id>              complete or reopen a goal
  rm-goal <id>                           delete a goal
  buy <item>                             buy a shop item
  fit <item> <scale> <x> <y>             adjust an accessory
  go home|shop|calendar                  switch view
  month next|prev                        page the calendar
  show                                   redraw the current view
  json                                   print the session as JSON
  help                                   this text
  quit                                   leave (nothing is saved)

A number right after the date (task) or the verb (goal) is read as points.
For a name that starts with a number, give the points first: goal 20 3 laps";

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddTask {
        deadline: String,
        points: Option<u32>,
        name: String,
    },
    Status {
        id: AssignmentId,
        status: AssignmentStatus,
    },
    Rename {
        id: AssignmentId,
        name: String,
    },
    RemoveTask(AssignmentId),
    AddGoal {
        points: Option<u32>,
        name: String,
    },
    Check(GoalId),
    Uncheck(GoalId),
    RemoveGoal(GoalId),
    Buy(ItemId),
    Fit {
        item: ItemId,
        scale: f64,
        x: i32,
        y: i32,
    },
    Go(View),
    Month(i32),
    Show,
    Json,
    Help,
    Quit,
}

fn arg<'a>(parts: &[&'a str], index: usize, what: &str) -> Result<&'a str, String> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| format!("missing {what}"))
}

fn number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("invalid {what}: '{raw}'"))
}

/// Leading number (if any) followed by the rest as a name.
///
/// The first number always wins, so `3 laps` is three points named "laps".
fn points_and_name(rest: &[&str]) -> (Option<u32>, String) {
    match rest.split_first() {
        Some((first, tail)) => match first.parse::<u32>() {
            Ok(points) => (Some(points), tail.join(" ")),
            Err(_) => (None, rest.join(" ")),
        },
        None => (None, String::new()),
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some((&verb, rest)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "task" => {
            let deadline = arg(rest, 0, "deadline")?.to_string();
            let (points, name) = points_and_name(&rest[1..]);
            Command::AddTask {
                deadline,
                points,
                name,
            }
        }
        "status" => Command::Status {
            id: AssignmentId(number(arg(rest, 0, "assignment id")?, "assignment id")?),
            status: arg(rest, 1, "status")?
                .parse()
                .map_err(|e: tamadoro_core::ValidationError| e.to_string())?,
        },
        "rename" => Command::Rename {
            id: AssignmentId(number(arg(rest, 0, "assignment id")?, "assignment id")?),
            name: rest.get(1..).unwrap_or_default().join(" "),
        },
        "rm-task" => Command::RemoveTask(AssignmentId(number(
            arg(rest, 0, "assignment id")?,
            "assignment id",
        )?)),
        "goal" => {
            let (points, name) = points_and_name(rest);
            Command::AddGoal { points, name }
        }
        "check" => Command::Check(GoalId(number(arg(rest, 0, "goal id")?, "goal id")?)),
        "uncheck" => Command::Uncheck(GoalId(number(arg(rest, 0, "goal id")?, "goal id")?)),
        "rm-goal" => Command::RemoveGoal(GoalId(number(arg(rest, 0, "goal id")?, "goal id")?)),
        "buy" => Command::Buy(ItemId(number(arg(rest, 0, "item id")?, "item id")?)),
        "fit" => Command::Fit {
            item: ItemId(number(arg(rest, 0, "item id")?, "item id")?),
            scale: number(arg(rest, 1, "scale")?, "scale")?,
            x: number(arg(rest, 2, "x offset")?, "x offset")?,
            y: number(arg(rest, 3, "y offset")?, "y offset")?,
        },
        "go" => Command::Go(
            arg(rest, 0, "view")?
                .parse()
                .map_err(|e: tamadoro_core::ValidationError| e.to_string())?,
        ),
        "month" => match arg(rest, 0, "direction")? {
            "next" | "+" => Command::Month(1),
            "prev" | "-" => Command::Month(-1),
            other => return Err(format!("invalid direction: '{other}' (expected next or prev)")),
        },
        "show" => Command::Show,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (type help)")),
    };
    Ok(Some(command))
}

/// Text to print after a line, and whether to stop.
#[derive(Debug, Default)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn text(output: String) -> Self {
        Self {
            output,
            quit: false,
        }
    }
}

/// Session plus the presentation state that only the terminal needs.
pub struct Repl {
    session: Session,
    month: MonthGrid,
    default_assignment_points: u32,
    default_goal_points: u32,
}

impl Repl {
    pub fn new(session: Session, config: &Config, today: NaiveDate) -> Self {
        Self {
            session,
            month: MonthGrid::containing(today),
            default_assignment_points: config.session.default_assignment_points,
            default_goal_points: config.session.default_goal_points,
        }
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Handle one input line.
    pub fn handle(&mut self, input: &str) -> Reply {
        match parse_command(input) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Reply::default(),
            Err(message) => Reply::text(format!("error: {message}\n")),
        }
    }

    fn execute(&mut self, command: Command) -> Reply {
        match self.apply(command) {
            Ok(reply) => reply,
            Err(e) => Reply::text(format!("error: {e}\n")),
        }
    }

    fn apply(&mut self, command: Command) -> CoreResult<Reply> {
        let events = match command {
            Command::AddTask {
                deadline,
                points,
                name,
            } => {
                let points = points.unwrap_or(self.default_assignment_points);
                let id = self.session.add_assignment(&name, &deadline, points)?;
                let _ = self.jump_to(&deadline);
                tracing::debug!(%id, "added from repl");
                Vec::new()
            }
            Command::Status { id, status } => self.session.update_assignment_status(id, status),
            Command::Rename { id, name } => self.session.update_assignment(
                id,
                AssignmentPatch {
                    name: Some(name),
                    ..AssignmentPatch::default()
                },
            )?,
            Command::RemoveTask(id) => self.session.delete_assignment(id),
            Command::AddGoal { points, name } => {
                self.session
                    .add_goal(&name, points.unwrap_or(self.default_goal_points))?;
                Vec::new()
            }
            Command::Check(id) => self.session.toggle_goal(id, true),
            Command::Uncheck(id) => self.session.toggle_goal(id, false),
            Command::RemoveGoal(id) => self.session.delete_goal(id),
            Command::Buy(item) => vec![self.session.purchase_item(item)?],
            Command::Fit { item, scale, x, y } => {
                self.session.fit_accessory(item, scale, x, y)?;
                Vec::new()
            }
            Command::Go(view) => self.session.navigate(view).into_iter().collect(),
            Command::Month(step) => {
                self.month = self.month.shift(step)?;
                Vec::new()
            }
            Command::Show => Vec::new(),
            Command::Json => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())?;
                return Ok(Reply::text(format!("{json}\n")));
            }
            Command::Help => return Ok(Reply::text(format!("{HELP}\n"))),
            Command::Quit => {
                return Ok(Reply {
                    output: "Bye!\n".to_string(),
                    quit: true,
                })
            }
        };

        let mut output = String::new();
        for event in &events {
            output.push_str(&render_event(event));
        }
        output.push_str(&self.render());
        Ok(Reply::text(output))
    }

    /// Show the month of a freshly added deadline.
    fn jump_to(&mut self, deadline: &str) -> Option<()> {
        let date = NaiveDate::parse_from_str(deadline, tamadoro_core::task::DEADLINE_FORMAT).ok()?;
        self.month = MonthGrid::containing(date);
        Some(())
    }

    /// Draw the active view.
    pub fn render(&self) -> String {
        match self.session.view() {
            View::Home => self.render_home(),
            View::Shop => self.render_shop(),
            View::Calendar => self.render_calendar(),
        }
    }

    fn render_home(&self) -> String {
        let s = &self.session;
        let p = s.current_stage();
        let mut out = String::from("== Home ==\n");

        let _ = match &p.next {
            Some(next) => writeln!(
                out,
                "Pet: {}  {} XP  [{}] {:.0}% to {}",
                p.current.name,
                p.experience,
                progress_bar(p.fraction, 20),
                p.percent(),
                next.name
            ),
            None => writeln!(out, "Pet: {}  {} XP  (fully grown)", p.current.name, p.experience),
        };
        let _ = writeln!(out, "Health: {}  Points: {}", s.health(), s.point_balance());
        let _ = writeln!(out, "Says: \"{}\"", s.message());

        let look = s.appearance();
        let mut worn = Vec::new();
        if let Some(skin) = &look.skin {
            worn.push(skin.name.clone());
        }
        if let Some(background) = &look.background {
            worn.push(format!("{} backdrop", background.name));
        }
        if let Some((hat, fit)) = &look.headwear {
            worn.push(format!(
                "{} (x{:.1}, {}, {})",
                hat.name, fit.scale, fit.offset_x, fit.offset_y
            ));
        }
        worn.extend(look.ornaments.iter().map(|item| item.name.clone()));
        if !worn.is_empty() {
            let _ = writeln!(out, "Wearing: {}", worn.join(", "));
        }

        out.push_str("\nAssignments:\n");
        let assignments = s.ordered_assignments();
        if assignments.is_empty() {
            out.push_str("  (none)\n");
        }
        for a in assignments {
            let _ = writeln!(
                out,
                "  #{:<3} [{:<11}] {}  {} ({} pts)",
                a.id.0,
                a.status.label(),
                a.deadline_string(),
                a.name,
                a.points
            );
        }

        out.push_str("\nGoals:\n");
        let goals = s.ordered_goals();
        if goals.is_empty() {
            out.push_str("  (none)\n");
        }
        for g in goals {
            let mark = if g.completed { "x" } else { " " };
            let _ = writeln!(out, "  #{:<3} [{mark}] {} ({} pts)", g.id.0, g.name, g.points);
        }
        out
    }

    fn render_shop(&self) -> String {
        let s = &self.session;
        let mut out = String::from("== Shop ==\n");
        let _ = writeln!(out, "Balance: {} points\n", s.point_balance());
        for item in s.catalog().items() {
            let state = if s.owns(item.id) {
                "owned".to_string()
            } else {
                format!("{} pts", item.price)
            };
            let _ = writeln!(
                out,
                "  #{:<3} {:<18} {:<10} {:>9}",
                item.id.0,
                item.name,
                item.category.to_string(),
                state
            );
        }
        out
    }

    fn render_calendar(&self) -> String {
        let buckets = self.session.calendar_buckets();
        let mut out = String::from("== Calendar ==\n");
        out.push_str(&render_month(&self.month, |day| buckets.contains_key(&day)));

        let due: Vec<_> = self
            .month
            .days_with(&buckets)
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .collect();
        if !due.is_empty() {
            out.push_str("\nDue:\n");
        }
        for (day, items) in due {
            let names: Vec<String> = items
                .iter()
                .map(|a| {
                    if a.is_completed() {
                        format!("{} (done)", a.name)
                    } else {
                        a.name.clone()
                    }
                })
                .collect();
            let _ = writeln!(out, "  {}: {}", day.format("%m/%d"), names.join(", "));
        }
        out
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

/// Month title, weekday header and day numbers. Days with work due get a `*`.
pub fn render_month(grid: &MonthGrid, has_due: impl Fn(NaiveDate) -> bool) -> String {
    use chrono::Datelike;

    let mut out = String::new();
    let _ = writeln!(out, "{:^28}", grid.title());
    out.push_str("  Su  Mo  Tu  We  Th  Fr  Sa\n");
    for week in grid.weeks() {
        let mut row = String::new();
        for cell in week {
            match cell {
                Some(day) => {
                    let mark = if has_due(day) { '*' } else { ' ' };
                    let _ = write!(row, "{:>3}{mark}", day.day());
                }
                None => row.push_str("    "),
            }
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_event(event: &Event) -> String {
    match event {
        Event::AssignmentCompleted {
            message, points, ..
        }
        | Event::GoalCompleted {
            message, points, ..
        } => format!("* {message} (+{points} XP)\n"),
        Event::StageChanged { from, to, .. } => format!("* Your pet changed from {from} to {to}!\n"),
        Event::ItemPurchased {
            id, price, balance, ..
        } => format!("* Bought item #{id} for {price} points ({balance} left)\n"),
        Event::MessageChanged { message, .. } => format!("Pet: \"{message}\"\n"),
        Event::ViewChanged { .. } => String::new(),
    }
}

async fn event_loop(mut repl: Repl, period: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = MoodTicker::new(period);

    print!("{}", repl.render());
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let reply = repl.handle(&line);
                print!("{}", reply.output);
                if reply.quit {
                    break;
                }
            }
            _ = ticker.tick() => {
                if let Some(event) = repl.session_mut().refresh_message() {
                    print!("{}", render_event(&event));
                }
            }
        }
    }
    Ok(())
}

pub fn run(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let session = Session::new(&config)?;
    let repl = Repl::new(session, &config, Local::now().date_naive());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(event_loop(repl, config.message_interval()));
    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> Repl {
        let mut config = Config::default();
        config.session.message_seed = Some(5);
        let session = Session::new(&config).unwrap();
        Repl::new(session, &config, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[test]
    fn parse_task_with_and_without_points() {
        assert_eq!(
            parse_command("task 2024-06-01 30 Lab report").unwrap(),
            Some(Command::AddTask {
                deadline: "2024-06-01".into(),
                points: Some(30),
                name: "Lab report".into(),
            })
        );
        assert_eq!(
            parse_command("task 2024-06-01 Lab report").unwrap(),
            Some(Command::AddTask {
                deadline: "2024-06-01".into(),
                points: None,
                name: "Lab report".into(),
            })
        );
    }

    #[test]
    fn leading_number_is_points_unless_points_come_first() {
        assert_eq!(
            parse_command("goal 3 laps").unwrap(),
            Some(Command::AddGoal {
                points: Some(3),
                name: "laps".into(),
            })
        );
        assert_eq!(
            parse_command("goal 20 3 laps").unwrap(),
            Some(Command::AddGoal {
                points: Some(20),
                name: "3 laps".into(),
            })
        );
        assert!(HELP.contains("goal 20 3 laps"));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_command("dance").is_err());
        assert!(parse_command("status x done").is_err());
        assert!(parse_command("status 1 sideways").is_err());
        assert!(parse_command("month later").is_err());
        assert!(parse_command("fit 1 big 0 0").is_err());
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn parse_navigation() {
        assert_eq!(parse_command("go cal").unwrap(), Some(Command::Go(View::Calendar)));
        assert_eq!(parse_command("month prev").unwrap(), Some(Command::Month(-1)));
        assert_eq!(parse_command("QUIT").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn completing_a_task_celebrates() {
        let mut r = repl();
        r.handle("task 2024-06-01 50 Essay");
        let reply = r.handle("status 1 done");
        assert!(reply.output.contains("(+50 XP)"));
        assert!(reply.output.contains("changed from Egg to Child"));
        assert!(reply.output.contains("Pet: Child"));
    }

    #[test]
    fn defaults_fill_missing_points() {
        let mut r = repl();
        r.handle("task 2024-06-01 Essay");
        r.handle("goal Stretch");
        let s = r.session_mut();
        assert_eq!(s.assignments()[0].points, 50);
        assert_eq!(s.goals()[0].points, 20);
    }

    #[test]
    fn validation_errors_are_reported() {
        let mut r = repl();
        assert!(r.handle("task 2024-6-1 Essay").output.starts_with("error:"));
        assert!(r.handle("goal 10").output.starts_with("error:"));
        assert!(r.session_mut().assignments().is_empty());
    }

    #[test]
    fn buying_twice_is_refused() {
        let mut r = repl();
        let first = r.handle("buy 3");
        assert!(first.output.contains("Bought item #3"));
        let second = r.handle("buy 3");
        assert_eq!(
            second.output,
            "error: Purchase rejected: item 3 is already owned\n"
        );
        assert_eq!(r.session_mut().point_balance(), 175);
    }

    #[test]
    fn calendar_marks_due_days() {
        let mut r = repl();
        r.handle("task 2024-06-10 10 Quiz");
        let reply = r.handle("go calendar");
        assert!(reply.output.contains("June 2024"));
        assert!(reply.output.contains("10*"));
        assert!(reply.output.contains("06/10: Quiz"));

        let next = r.handle("month next");
        assert!(next.output.contains("July 2024"));
    }

    #[test]
    fn month_layout_starts_on_sunday() {
        let grid = MonthGrid::new(2024, 6).unwrap();
        let text = render_month(&grid, |_| false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  Su  Mo  Tu  We  Th  Fr  Sa");
        // June 1st 2024 is a Saturday.
        assert_eq!(lines[2].trim(), "1");
        assert!(lines[2].ends_with("  1"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut r = repl();
        assert!(r.handle("quit").quit);
        assert!(!r.handle("help").quit);
    }

    #[test]
    fn progress_bar_width() {
        assert_eq!(progress_bar(0.3, 10), "###-------");
        assert_eq!(progress_bar(1.5, 4), "####");
    }
}
