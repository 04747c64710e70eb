//! Console command parsing
//!
//! Each input line is one command. Navigation commands mirror the web
//! routes (`/explore`, `/rooms/<id>` ...); the rest are the actions those
//! pages offer. Arguments are whitespace separated, double quotes group.

use chrono::{DateTime, Duration, Utc};
use roomloop_core::{RoomFilter, RoomStatus, RoomTag, RoomType};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

pub type ParseResult<T> = std::result::Result<T, CommandError>;

/// Pages of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Explore(RoomFilter),
    Dashboard(Option<RoomStatus>),
    Room(String),
}

/// Raw form fields for a new room, resolved against the clock later
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: Option<String>,
    pub description: String,
    pub room_type: Option<RoomType>,
    pub start: Option<TimeSpec>,
    pub end: Option<TimeSpec>,
    pub duration: Option<Duration>,
    pub max_participants: Option<u32>,
    pub tag: Option<RoomTag>,
    /// Usernames
    pub invite: Vec<String>,
}

/// A point in time given as an offset from now or as RFC 3339
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    Relative(Duration),
    Absolute(DateTime<Utc>),
}

impl TimeSpec {
    pub fn resolve(&self, now: DateTime<Utc>) -> roomloop_core::Result<DateTime<Utc>> {
        match self {
            TimeSpec::Relative(offset) => now
                .checked_add_signed(*offset)
                .ok_or_else(out_of_range),
            TimeSpec::Absolute(at) => Ok(*at),
        }
    }
}

pub(crate) fn out_of_range() -> roomloop_core::Error {
    roomloop_core::Error::InvalidOperation("time is out of range".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Go(Route),
    Create(CreateForm),
    Login { email: String, password: String },
    Signup { username: String, email: String, password: String },
    Logout,
    Join(String),
    Leave(String),
    Say { room: String, text: String },
    React { room: String, emoji: String },
    Invite { room: String, usernames: Vec<String> },
    SetStatus { room: String, status: RoomStatus },
    Refresh,
}

/// Split a line into words, keeping double-quoted runs together
pub fn tokenize(line: &str) -> ParseResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse `30m`, `2h`, `1d` (optionally signed)
pub fn parse_duration(field: &str, value: &str) -> ParseResult<Duration> {
    let invalid = |reason: &str| CommandError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let Some((split, unit)) = body.char_indices().last() else {
        return Err(invalid("expected a number followed by m, h or d"));
    };
    let amount: i64 = body[..split]
        .parse()
        .map_err(|_| invalid("expected a number followed by m, h or d"))?;

    let duration = match unit {
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        _ => return Err(invalid("unit must be m, h or d")),
    }
    .ok_or_else(|| invalid("duration is out of range"))?;

    Ok(if negative { -duration } else { duration })
}

fn parse_time(field: &str, value: &str) -> ParseResult<TimeSpec> {
    if value == "now" {
        return Ok(TimeSpec::Relative(Duration::zero()));
    }
    if value.starts_with('+') || value.starts_with('-') {
        return parse_duration(field, value).map(TimeSpec::Relative);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|at| TimeSpec::Absolute(at.with_timezone(&Utc)))
        .map_err(|e| CommandError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str) -> ParseResult<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| CommandError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

fn split_pair(token: &str) -> ParseResult<(&str, &str)> {
    token.split_once('=').ok_or_else(|| CommandError::InvalidValue {
        field: token.to_string(),
        reason: "expected key=value".to_string(),
    })
}

fn parse_filter(args: &[String]) -> ParseResult<RoomFilter> {
    let mut filter = RoomFilter::default();
    for arg in args {
        let (key, value) = split_pair(arg)?;
        filter = match key {
            "status" if value == "all" => filter,
            "status" => filter.with_status(parse_value(key, value)?),
            "tag" if value == "all" => filter,
            "tag" => filter.with_tag(parse_value(key, value)?),
            "q" | "search" => filter.with_search(value),
            _ => return Err(CommandError::Usage(EXPLORE_USAGE)),
        };
    }
    Ok(filter)
}

fn parse_create(args: &[String]) -> ParseResult<CreateForm> {
    let mut form = CreateForm::default();
    for arg in args {
        let (key, value) = split_pair(arg)?;
        match key {
            "title" => form.title = Some(value.to_string()),
            "desc" | "description" => form.description = value.to_string(),
            "type" => form.room_type = Some(parse_value(key, value)?),
            "start" => form.start = Some(parse_time(key, value)?),
            "end" => form.end = Some(parse_time(key, value)?),
            "duration" => form.duration = Some(parse_duration(key, value)?),
            "cap" | "max" => form.max_participants = Some(parse_value(key, value)?),
            "tag" => form.tag = Some(parse_value(key, value)?),
            "invite" => form.invite.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            ),
            _ => return Err(CommandError::Usage(CREATE_USAGE)),
        }
    }
    if form.end.is_some() && form.duration.is_some() {
        return Err(CommandError::InvalidValue {
            field: "end".to_string(),
            reason: "give either end or duration, not both".to_string(),
        });
    }
    Ok(form)
}

const EXPLORE_USAGE: &str = "explore [status=live|scheduled|closed] [tag=<tag>] [q=<text>]";
const DASHBOARD_USAGE: &str = "dashboard [status=live|scheduled|closed]";
const CREATE_USAGE: &str = "create title=<text> [desc=<text>] [type=public|private] [start=+10m|now|<rfc3339>] [end=+1h|<rfc3339>] [duration=45m] [cap=<n>] [tag=<tag>] [invite=<user,user>]";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> ParseResult<Option<Command>> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "/" | "home" => Command::Go(Route::Home),
        "/about" | "about" => Command::Go(Route::About),
        "/explore" | "explore" => Command::Go(Route::Explore(parse_filter(args)?)),
        "/dashboard" | "dashboard" => {
            let filter = parse_filter(args).map_err(|_| CommandError::Usage(DASHBOARD_USAGE))?;
            if filter.tag.is_some() || filter.search.is_some() {
                return Err(CommandError::Usage(DASHBOARD_USAGE));
            }
            Command::Go(Route::Dashboard(filter.status))
        }
        "room" => match args {
            [id] => Command::Go(Route::Room(id.clone())),
            _ => return Err(CommandError::Usage("room <id>")),
        },
        path if path.starts_with("/rooms/") => {
            let id = &path["/rooms/".len()..];
            if id.is_empty() || !args.is_empty() {
                return Err(CommandError::Usage("/rooms/<id>"));
            }
            Command::Go(Route::Room(id.to_string()))
        }
        "/create-room" | "create" => Command::Create(parse_create(args)?),
        "/login" | "login" => match args {
            [email] => Command::Login {
                email: email.clone(),
                password: String::new(),
            },
            [email, password] => Command::Login {
                email: email.clone(),
                password: password.clone(),
            },
            _ => return Err(CommandError::Usage("login <email> [password]")),
        },
        "/signup" | "signup" => match args {
            [username, email] => Command::Signup {
                username: username.clone(),
                email: email.clone(),
                password: String::new(),
            },
            [username, email, password] => Command::Signup {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            },
            _ => return Err(CommandError::Usage("signup <username> <email> [password]")),
        },
        "logout" => Command::Logout,
        "join" => match args {
            [id] => Command::Join(id.clone()),
            _ => return Err(CommandError::Usage("join <id>")),
        },
        "leave" => match args {
            [id] => Command::Leave(id.clone()),
            _ => return Err(CommandError::Usage("leave <id>")),
        },
        "say" => match args {
            [id, words @ ..] if !words.is_empty() => Command::Say {
                room: id.clone(),
                text: words.join(" "),
            },
            _ => return Err(CommandError::Usage("say <id> <message>")),
        },
        "react" => match args {
            [id, emoji] => Command::React {
                room: id.clone(),
                emoji: emoji.clone(),
            },
            _ => return Err(CommandError::Usage("react <id> <emoji>")),
        },
        "invite" => match args {
            [id, names @ ..] if !names.is_empty() => Command::Invite {
                room: id.clone(),
                usernames: names.to_vec(),
            },
            _ => return Err(CommandError::Usage("invite <id> <username>...")),
        },
        "status" => match args {
            [id, status] => Command::SetStatus {
                room: id.clone(),
                status: parse_value("status", status)?,
            },
            _ => return Err(CommandError::Usage("status <id> scheduled|live|closed")),
        },
        "refresh" => Command::Refresh,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"create title="Friday Doodles" cap=5"#).unwrap(),
            vec!["create", "title=Friday Doodles", "cap=5"]
        );
        assert_eq!(tokenize(r#"say abc """#).unwrap(), vec!["say", "abc", ""]);
        assert_eq!(tokenize("  ").unwrap(), Vec::<String>::new());
        assert_eq!(tokenize(r#"say "oops"#), Err(CommandError::UnterminatedQuote));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_routes() {
        assert_eq!(parse("/").unwrap(), Some(Command::Go(Route::Home)));
        assert_eq!(
            parse("/rooms/1a2b").unwrap(),
            Some(Command::Go(Route::Room("1a2b".to_string())))
        );
        assert_eq!(
            parse("dashboard status=live").unwrap(),
            Some(Command::Go(Route::Dashboard(Some(RoomStatus::Live))))
        );
        assert!(parse("dashboard tag=Work").is_err());
    }

    #[test]
    fn test_explore_filters() {
        let Some(Command::Go(Route::Explore(filter))) =
            parse(r#"explore status=scheduled tag=wellness q="deep focus""#).unwrap()
        else {
            panic!("expected explore route");
        };
        assert_eq!(filter.status, Some(RoomStatus::Scheduled));
        assert_eq!(filter.tag, Some(RoomTag::Wellness));
        assert_eq!(filter.search.as_deref(), Some("deep focus"));

        assert!(parse("explore status=open").is_err());
    }

    #[test]
    fn test_create_form() {
        let Some(Command::Create(form)) = parse(
            r#"create title="Lunch & Learn" type=public start=+10m duration=45m cap=8 tag=Work invite=jane,john"#,
        )
        .unwrap() else {
            panic!("expected create");
        };
        assert_eq!(form.title.as_deref(), Some("Lunch & Learn"));
        assert_eq!(form.room_type, Some(RoomType::Public));
        assert_eq!(form.start, Some(TimeSpec::Relative(Duration::minutes(10))));
        assert_eq!(form.duration, Some(Duration::minutes(45)));
        assert_eq!(form.max_participants, Some(8));
        assert_eq!(form.tag, Some(RoomTag::Work));
        assert_eq!(form.invite, vec!["jane", "john"]);

        assert!(parse("create end=+1h duration=1h").is_err());
        assert!(parse("create cap=many").is_err());
    }

    #[test]
    fn test_time_specs() {
        let now = Utc::now();
        assert_eq!(parse_time("start", "now").unwrap().resolve(now).unwrap(), now);
        assert_eq!(
            parse_time("start", "-30m").unwrap().resolve(now).unwrap(),
            now - Duration::minutes(30)
        );
        let TimeSpec::Absolute(at) = parse_time("end", "2025-05-15T21:00:00Z").unwrap() else {
            panic!("expected absolute time");
        };
        assert_eq!(at.to_rfc3339(), "2025-05-15T21:00:00+00:00");
        assert!(parse_time("start", "tomorrow").is_err());
        assert!(parse_duration("duration", "10x").is_err());
    }

    #[test]
    fn test_multibyte_unit_is_rejected() {
        assert_eq!(
            parse("create start=+5é").unwrap_err(),
            CommandError::InvalidValue {
                field: "start".to_string(),
                reason: "unit must be m, h or d".to_string()
            }
        );
        assert!(parse_duration("duration", "é").is_err());
        assert!(parse_duration("duration", "+").is_err());
        assert!(parse_duration("duration", "m").is_err());
    }

    #[test]
    fn test_out_of_range_times() {
        let err = parse("create duration=9223372036854775807m").unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidValue {
                field: "duration".to_string(),
                reason: "duration is out of range".to_string()
            }
        );

        let spec = parse_time("start", "+100000000d").unwrap();
        let err = spec.resolve(Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: time is out of range");

        assert_eq!(
            parse_duration("duration", "-90m").unwrap(),
            -Duration::minutes(90)
        );
    }

    #[test]
    fn test_actions() {
        assert_eq!(
            parse("say ab12 hello there").unwrap(),
            Some(Command::Say {
                room: "ab12".to_string(),
                text: "hello there".to_string()
            })
        );
        assert_eq!(
            parse("status ab12 closed").unwrap(),
            Some(Command::SetStatus {
                room: "ab12".to_string(),
                status: RoomStatus::Closed
            })
        );
        assert_eq!(
            parse("login demo@roomloop.com").unwrap(),
            Some(Command::Login {
                email: "demo@roomloop.com".to_string(),
                password: String::new()
            })
        );
        assert_eq!(parse("join").unwrap_err(), CommandError::Usage("join <id>"));
        assert_eq!(
            parse("dance").unwrap_err(),
            CommandError::Unknown("dance".to_string())
        );
    }
}
