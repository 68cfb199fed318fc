//! Command line interface

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context as _};
use chrono::Local;
use themove_core::geo::Coordinates;
use themove_core::time::parse_local_input;
use themove_core::{
    ActivityType, BoardConfig, CampusArea, FilterTag, JoinOutcome, LeaveOutcome, Move, MoveDraft,
};

use crate::clock::run_refresh;
use crate::display::View;
use crate::state::BoardState;

/// The Move: see what's happening on campus and join in
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (defaults to the platform config directory)
    #[clap(long, env = "THEMOVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Act as this user id instead of the configured one
    #[clap(long, env = "THEMOVE_USER_ID")]
    pub user_id: Option<String>,

    /// Act under this display name instead of the configured one
    #[clap(long, env = "THEMOVE_USER_NAME")]
    pub user_name: Option<String>,

    /// Json output
    #[clap(long)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load config and apply identity overrides
    pub fn load_config(&self) -> anyhow::Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::load(path),
            None => BoardConfig::load_default(),
        }
        .context("failed to load config")?;

        if let Some(id) = &self.user_id {
            config.user.id = id.clone();
        }
        if let Some(name) = &self.user_name {
            config.user.name = name.clone();
        }
        Ok(config)
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Browse the feed: live first, then upcoming, then past
    Explore(FeedArgs),

    /// Moves you joined, host, are waitlisted for, or saved
    Mine {
        #[clap(long, value_enum, default_value = "all")]
        view: MineView,
    },

    /// Show one move in full
    Show {
        id: String,
        /// Your position as LAT,LON
        #[clap(long)]
        near: Option<String>,
    },

    /// Post a new move
    Create(MoveArgs),

    /// Edit a move you host
    Edit {
        id: String,
        #[clap(flatten)]
        fields: MoveArgs,
    },

    /// Join a move (or its waitlist when full)
    Join {
        id: String,
        /// Answer to the host's signup question
        #[clap(long)]
        response: Option<String>,
    },

    /// Leave a move or its waitlist
    Leave { id: String },

    /// Cancel a move you host
    Cancel { id: String },

    /// Comment on a move
    Comment { id: String, text: String },

    /// Save or unsave a move
    Save { id: String },

    /// Keep the feed on screen, refreshing live/upcoming labels
    Watch(FeedArgs),
}

#[derive(Debug, clap::ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum MineView {
    All,
    Joined,
    Hosting,
    Waitlisted,
    Saved,
}

#[derive(Debug, Default, clap::Args)]
pub struct FeedArgs {
    /// Area chip (North, South, Downtown, Other); repeatable
    #[clap(long)]
    pub area: Vec<String>,

    /// Activity chip (Food, Study, Sports, Social, Other); repeatable
    #[clap(long)]
    pub activity: Vec<String>,

    /// Search title, description and location
    #[clap(long, short)]
    pub query: Option<String>,

    /// Your position as LAT,LON
    #[clap(long)]
    pub near: Option<String>,
}

impl FeedArgs {
    fn tags(&self) -> anyhow::Result<Vec<FilterTag>> {
        let areas = self.area.iter().map(|label| {
            CampusArea::from_label(label)
                .map(FilterTag::Area)
                .ok_or_else(|| anyhow!("unknown area '{}'", label))
        });
        let activities = self.activity.iter().map(|label| {
            ActivityType::from_label(label)
                .map(FilterTag::Activity)
                .ok_or_else(|| anyhow!("unknown activity '{}'", label))
        });
        areas.chain(activities).collect()
    }

    fn apply(&self, state: &mut BoardState) -> anyhow::Result<()> {
        state.filter.clear();
        for tag in self.tags()? {
            state.filter.toggle(tag);
        }
        state.filter.query = self.query.clone().unwrap_or_default();
        Ok(())
    }
}

/// Form fields for create and edit. Omitted fields keep their current value.
#[derive(Debug, Default, clap::Args)]
pub struct MoveArgs {
    #[clap(long)]
    pub title: Option<String>,
    #[clap(long)]
    pub description: Option<String>,
    #[clap(long)]
    pub location: Option<String>,
    /// Start, e.g. "2026-10-18 19:00" (local time) or RFC 3339
    #[clap(long)]
    pub start: Option<String>,
    /// End, same formats as --start
    #[clap(long)]
    pub end: Option<String>,
    #[clap(long)]
    pub activity: Option<String>,
    #[clap(long)]
    pub area: Option<String>,
    /// Roster capacity
    #[clap(long = "max")]
    pub max_participants: Option<u32>,
    /// Short place name shown on cards
    #[clap(long)]
    pub location_name: Option<String>,
    #[clap(long)]
    pub location_url: Option<String>,
    #[clap(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[clap(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
    #[clap(long)]
    pub remarks: Option<String>,
    /// Question attendees answer when joining
    #[clap(long)]
    pub prompt: Option<String>,
    #[clap(long)]
    pub require_response: Option<bool>,
}

impl MoveArgs {
    /// Overlay these fields on `draft`
    pub fn apply_to(&self, mut draft: MoveDraft) -> anyhow::Result<MoveDraft> {
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(location) = &self.location {
            draft.location = location.clone();
        }
        if let Some(start) = &self.start {
            draft.start_time = Some(
                parse_local_input(start, &Local)
                    .ok_or_else(|| anyhow!("could not read start time '{}'", start))?,
            );
        }
        if let Some(end) = &self.end {
            draft.end_time = Some(
                parse_local_input(end, &Local)
                    .ok_or_else(|| anyhow!("could not read end time '{}'", end))?,
            );
        }
        if let Some(activity) = &self.activity {
            draft.activity_type = Some(
                ActivityType::from_label(activity)
                    .ok_or_else(|| anyhow!("unknown activity '{}'", activity))?,
            );
        }
        if let Some(area) = &self.area {
            draft.area =
                CampusArea::from_label(area).ok_or_else(|| anyhow!("unknown area '{}'", area))?;
        }
        if let Some(max) = self.max_participants {
            draft.max_participants = Some(max);
        }
        if let Some(name) = &self.location_name {
            draft.location_name = Some(name.clone());
        }
        if let Some(url) = &self.location_url {
            draft.location_url = Some(url.clone());
        }
        if self.lat.is_some() || self.lon.is_some() {
            draft.latitude = self.lat;
            draft.longitude = self.lon;
        }
        if let Some(remarks) = &self.remarks {
            draft.remarks = remarks.clone();
        }
        if let Some(prompt) = &self.prompt {
            draft.signup_prompt = prompt.clone();
        }
        if let Some(required) = self.require_response {
            draft.signup_prompt_requires_response = required;
        }
        Ok(draft)
    }
}

/// Parse "LAT,LON"
fn parse_coordinates(value: &str) -> anyhow::Result<Coordinates> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected LAT,LON, got '{}'", value))?;
    Ok(Coordinates {
        latitude: lat.trim().parse().context("invalid latitude")?,
        longitude: lon.trim().parse().context("invalid longitude")?,
    })
}

const NO_MATCHES: &str = "No moves match. Try clearing filters.";

fn print_moves(
    state: &BoardState,
    args: &Cli,
    moves: &[Move],
    origin: Option<Coordinates>,
    empty: &str,
) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(moves)?);
        return Ok(());
    }
    let view = View {
        now: state.now(),
        user: state.user(),
        saved: state.saved_ids(),
        tz: &Local,
        origin,
    };
    println!("{}", view.list(moves, empty));
    Ok(())
}

fn require_move<'a>(state: &'a BoardState, id: &str) -> anyhow::Result<&'a Move> {
    state
        .find(id)
        .ok_or_else(|| anyhow!("no move with id '{}'", id))
}

impl Commands {
    pub async fn invoke(
        &self,
        state: &mut BoardState,
        args: &Cli,
        config: &BoardConfig,
    ) -> anyhow::Result<()> {
        match self {
            Self::Explore(feed) => {
                feed.apply(state)?;
                let origin = feed.near.as_deref().map(parse_coordinates).transpose()?;
                print_moves(state, args, &state.explore(), origin, NO_MATCHES)
            }
            Self::Mine { view } => {
                let sections = [
                    (MineView::Joined, "Joined", state.joined()),
                    (MineView::Hosting, "Hosting", state.hosting()),
                    (MineView::Waitlisted, "Waitlisted", state.waitlisted()),
                    (MineView::Saved, "Saved", state.saved()),
                ];
                for (kind, heading, moves) in sections {
                    if *view != MineView::All && *view != kind {
                        continue;
                    }
                    if !args.json {
                        println!("== {} ==", heading);
                    }
                    print_moves(state, args, &moves, None, "Nothing here yet.")?;
                    if !args.json {
                        println!();
                    }
                }
                Ok(())
            }
            Self::Show { id, near } => {
                let origin = near.as_deref().map(parse_coordinates).transpose()?;
                let mv = state
                    .select(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("no move with id '{}'", id))?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&mv)?);
                    return Ok(());
                }
                let view = View {
                    now: state.now(),
                    user: state.user(),
                    saved: state.saved_ids(),
                    tz: &Local,
                    origin,
                };
                println!("{}", view.detail(&mv));
                Ok(())
            }
            Self::Create(fields) => {
                let draft = fields.apply_to(state.new_draft())?;
                let id = state.create(&draft)?;
                println!("Posted! Your move id is {}", id);
                Ok(())
            }
            Self::Edit { id, fields } => {
                let current = require_move(state, id)?;
                let draft = fields.apply_to(MoveDraft::from_move(current))?;
                state.edit(id, &draft)?;
                println!("Updated {}", id);
                Ok(())
            }
            Self::Join { id, response } => {
                let title = require_move(state, id)?.title.clone();
                match state.join(id, response.as_deref())? {
                    JoinOutcome::Joined => println!("You're going to {}.", title),
                    JoinOutcome::Waitlisted => {
                        let position = state
                            .find(id)
                            .map(|mv| mv.waitlist.len())
                            .unwrap_or_default();
                        println!("{} is full. You're #{} on the waitlist.", title, position);
                    }
                    JoinOutcome::AlreadyJoined => println!("You're already going to {}.", title),
                    JoinOutcome::AlreadyWaitlisted => {
                        println!("You're already on the waitlist for {}.", title)
                    }
                    JoinOutcome::NotFound => bail!("no move with id '{}'", id),
                }
                Ok(())
            }
            Self::Leave { id } => {
                let title = require_move(state, id)?.title.clone();
                match state.leave(id) {
                    LeaveOutcome::Left { promoted } => {
                        println!("You left {}.", title);
                        if let Some(name) = promoted {
                            println!("{} moved up from the waitlist.", name);
                        }
                    }
                    LeaveOutcome::LeftWaitlist => println!("You left the waitlist for {}.", title),
                    LeaveOutcome::NotAttending => println!("You weren't going to {}.", title),
                    LeaveOutcome::HostCannotLeave => {
                        bail!("you host {}; cancel it instead", title)
                    }
                    LeaveOutcome::NotFound => bail!("no move with id '{}'", id),
                }
                Ok(())
            }
            Self::Cancel { id } => {
                let mv = require_move(state, id)?;
                if !mv.is_hosted_by(state.user()) {
                    bail!("only the host can cancel {}", mv.title);
                }
                state.cancel(id);
                println!("Cancelled {}", id);
                Ok(())
            }
            Self::Comment { id, text } => {
                require_move(state, id)?;
                if state.comment(id, text) {
                    println!("Comment posted.");
                } else {
                    println!("Nothing to post.");
                }
                Ok(())
            }
            Self::Save { id } => {
                let title = require_move(state, id)?.title.clone();
                if state.toggle_saved(id) {
                    println!("Saved {}.", title);
                } else {
                    println!("Removed {} from saved.", title);
                }
                Ok(())
            }
            Self::Watch(feed) => {
                feed.apply(state)?;
                let origin = feed.near.as_deref().map(parse_coordinates).transpose()?;
                let json = args.json;
                run_refresh(config.refresh_interval(), |now| {
                    state.refresh_clock(now);
                    if !json {
                        print!("\x1B[2J\x1B[H");
                        let clock = now.with_timezone(&Local).format("%-I:%M:%S %p");
                        println!("The Move | {}\n", clock);
                    }
                    let feed = state.explore();
                    if let Err(e) = print_moves(state, args, &feed, origin, NO_MATCHES) {
                        tracing::warn!(error = %e, "Failed to render feed");
                        return false;
                    }
                    true
                })
                .await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clap::Parser;

    #[test]
    fn test_parse_explore_chips() {
        let cli = Cli::parse_from([
            "themove", "explore", "--area", "north", "--activity", "Food", "-q", "boba",
        ]);
        let Commands::Explore(feed) = cli.command else {
            panic!("expected explore");
        };
        assert_eq!(
            feed.tags().unwrap(),
            vec![
                FilterTag::Area(CampusArea::North),
                FilterTag::Activity(ActivityType::Food)
            ]
        );
        assert_eq!(feed.query.as_deref(), Some("boba"));
    }

    #[test]
    fn test_unknown_chip_rejected() {
        let feed = FeedArgs {
            area: vec!["Uptown".to_string()],
            ..FeedArgs::default()
        };
        assert!(feed.tags().is_err());
    }

    #[test]
    fn test_move_args_overlay() {
        let args = MoveArgs {
            title: Some("Boba".to_string()),
            start: Some("2026-10-18T19:00:00Z".to_string()),
            activity: Some("food".to_string()),
            max_participants: Some(4),
            ..MoveArgs::default()
        };
        let draft = args.apply_to(MoveDraft::default()).unwrap();
        assert_eq!(draft.title, "Boba");
        assert_eq!(
            draft.start_time,
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 19, 0, 0).unwrap())
        );
        assert_eq!(draft.activity_type, Some(ActivityType::Food));
        assert_eq!(draft.max_participants, Some(4));
        assert_eq!(draft.end_time, None);
    }

    #[test]
    fn test_move_args_bad_time() {
        let args = MoveArgs {
            start: Some("after lunch".to_string()),
            ..MoveArgs::default()
        };
        assert!(args.apply_to(MoveDraft::default()).is_err());
    }

    #[test]
    fn test_parse_coordinates() {
        let coords = parse_coordinates("42.05, -87.67").unwrap();
        assert_eq!(coords.latitude, 42.05);
        assert_eq!(coords.longitude, -87.67);
        assert!(parse_coordinates("42.05").is_err());
    }

    #[test]
    fn test_identity_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cli = Cli::parse_from([
            "themove",
            "--config",
            path.to_str().unwrap(),
            "--user-id",
            "user-2",
            "--user-name",
            "Maya",
            "mine",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.user.id, "user-2");
        assert_eq!(config.user.name, "Maya");
    }
}
