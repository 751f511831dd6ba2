//! CLI command dispatcher.
//!
//! Dispatches commands to either the offline snapshot store or the
//! remote REST backend. Pure computations (expansion previews) run
//! without a store at all.

use anyhow::Result;
use chrono::Duration;

use bookline::config::Config;
use bookline::conflict::Candidate;
use bookline::feed;
use bookline::model::{
    parse_instant, Interval, ItemUpdate, RecurrencePattern, ResourceKind, ResourceUpdate,
    ScheduledItem, SeriesTemplate, ServiceEntry, DEFAULT_DURATION_MINUTES,
};
use bookline::recurrence;
use bookline::session::{Role, Session, User};

use super::types::{CheckResult, ExpandResult};
use super::{local, output, remote};

/// Where scheduling commands execute.
pub enum ExecutionMode {
    /// Offline snapshot store.
    Local(Box<Config>),
    /// Remote REST backend, optionally overriding the configured URL.
    Remote {
        config: Box<Config>,
        url: Option<String>,
    },
}

/// Fields shared by appointment creation and series templates.
pub struct BookingArgs {
    pub client: String,
    pub services: Vec<String>,
    pub duration: Option<i64>,
    pub owner: Option<String>,
    pub resource: Option<String>,
    pub notes: Option<String>,
    pub color: Option<String>,
}

impl BookingArgs {
    fn service_entries(&self) -> Vec<ServiceEntry> {
        self.services
            .iter()
            .map(|name| ServiceEntry::new(name.as_str()))
            .collect()
    }

    fn duration_minutes(&self) -> i64 {
        match self.duration {
            Some(minutes) if minutes > 0 => minutes,
            _ if !self.services.is_empty() => {
                self.services.len() as i64 * DEFAULT_DURATION_MINUTES
            }
            _ => DEFAULT_DURATION_MINUTES,
        }
    }
}

/// Run the expand command: a pure preview, no store involved.
pub fn run_expand(
    pattern: RecurrencePattern,
    start: &str,
    end: &str,
    duration: i64,
    all: bool,
    json_output: bool,
) -> Result<()> {
    let range_start = parse_instant(start)?;
    let range_end = parse_instant(end)?;
    let limit = if all {
        recurrence::UNLIMITED
    } else {
        recurrence::PREVIEW_LIMIT
    };

    let occurrences = recurrence::expand(
        pattern,
        Duration::minutes(duration),
        range_start,
        range_end,
        limit,
    );
    let truncated = !all
        && occurrences.len() == recurrence::PREVIEW_LIMIT
        && recurrence::expand(
            pattern,
            Duration::minutes(duration),
            range_start,
            range_end,
            recurrence::PREVIEW_LIMIT + 1,
        )
        .len()
            > recurrence::PREVIEW_LIMIT;

    output::print_expand(
        &ExpandResult {
            pattern,
            occurrences,
            truncated,
        },
        json_output,
    );
    Ok(())
}

/// Run the check command: an advisory conflict query.
pub async fn run_check(
    mode: ExecutionMode,
    start: &str,
    end: &str,
    owner: Option<String>,
    resource: Option<String>,
    exclude: Option<String>,
    json_output: bool,
) -> Result<()> {
    let interval = Interval::new(parse_instant(start)?, parse_instant(end)?)?;
    let candidate = Candidate {
        interval,
        owner,
        resource,
        exclude,
    };

    let conflicts = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.check(&candidate).await
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.check(&candidate).await
        }
    };

    output::print_check(
        &CheckResult {
            interval,
            conflicts,
        },
        json_output,
    );
    Ok(())
}

/// Run the list command.
pub async fn run_list(mode: ExecutionMode, json_output: bool) -> Result<()> {
    let items = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.items().await
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.items().await
        }
    };
    output::print_items(&items, json_output);
    Ok(())
}

/// Run the book command: create an appointment.
pub async fn run_book(
    mode: ExecutionMode,
    start: &str,
    args: BookingArgs,
    json_output: bool,
) -> Result<()> {
    let interval = Interval::with_duration(parse_instant(start)?, args.duration_minutes())?;
    let mut item =
        ScheduledItem::appointment(&args.client, interval).with_services(args.service_entries());
    if let Some(owner) = &args.owner {
        item = item.with_owner(owner);
    }
    if let Some(resource) = &args.resource {
        item = item.with_resource(resource);
    }
    if let Some(color) = &args.color {
        item = item.with_color(color);
    }
    if let Some(notes) = &args.notes {
        if let Some(details) = item.as_appointment_mut() {
            details.notes = Some(notes.clone());
        }
    }

    let created = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let created = store.scheduler.create(item).await?;
            store.persist().await?;
            created
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.create(item).await?
        }
    };
    output::print_item(&created, json_output);
    Ok(())
}

/// Run the block command: create a slot blocker.
pub async fn run_block(
    mode: ExecutionMode,
    start: &str,
    end: &str,
    owner: Option<String>,
    reason: Option<String>,
    json_output: bool,
) -> Result<()> {
    let interval = Interval::new(parse_instant(start)?, parse_instant(end)?)?;
    let mut item = ScheduledItem::blocker(interval);
    if let Some(owner) = &owner {
        item = item.with_owner(owner);
    }
    if let Some(reason) = &reason {
        item = item.with_reason(reason);
    }

    let created = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let created = store.scheduler.create(item).await?;
            store.persist().await?;
            created
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.create(item).await?
        }
    };
    output::print_item(&created, json_output);
    Ok(())
}

/// Run the move command.
pub async fn run_move(
    mode: ExecutionMode,
    id: &str,
    start: &str,
    end: &str,
    force: bool,
    json_output: bool,
) -> Result<()> {
    let interval = Interval::new(parse_instant(start)?, parse_instant(end)?)?;
    let moved = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let moved = store.scheduler.move_item(id, interval, force).await?;
            store.persist().await?;
            moved
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.move_item(id, interval, force).await?
        }
    };
    output::print_item(&moved, json_output);
    Ok(())
}

/// Run the resize command.
pub async fn run_resize(
    mode: ExecutionMode,
    id: &str,
    end: &str,
    force: bool,
    json_output: bool,
) -> Result<()> {
    let new_end = parse_instant(end)?;
    let resized = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let resized = store.scheduler.resize(id, new_end, force).await?;
            store.persist().await?;
            resized
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.resize(id, new_end, force).await?
        }
    };
    output::print_item(&resized, json_output);
    Ok(())
}

/// Run the delete command.
pub async fn run_delete(mode: ExecutionMode, id: &str, json_output: bool) -> Result<()> {
    match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.delete(id).await?;
            store.persist().await?;
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.delete(id).await?;
        }
    }
    output::print_done(&format!("Deleted {}", id), json_output);
    Ok(())
}

/// Run the complete command.
pub async fn run_complete(
    mode: ExecutionMode,
    id: &str,
    sale: Option<String>,
    json_output: bool,
) -> Result<()> {
    let completed = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let completed = store.scheduler.complete(id, sale.as_deref()).await?;
            store.persist().await?;
            completed
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.complete(id, sale.as_deref()).await?
        }
    };
    output::print_item(&completed, json_output);
    Ok(())
}

/// Run the accept command.
pub async fn run_accept(
    mode: ExecutionMode,
    id: &str,
    staff: &str,
    json_output: bool,
) -> Result<()> {
    let accepted = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let accepted = store.scheduler.accept(id, staff).await?;
            store.persist().await?;
            accepted
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.accept(id, staff).await?
        }
    };
    output::print_item(&accepted, json_output);
    Ok(())
}

/// Run the cancel command.
pub async fn run_cancel(mode: ExecutionMode, id: &str, json_output: bool) -> Result<()> {
    let cancelled = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let cancelled = store.scheduler.cancel(id).await?;
            store.persist().await?;
            cancelled
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.cancel(id).await?
        }
    };
    output::print_item(&cancelled, json_output);
    Ok(())
}

/// Run the series-create command.
pub async fn run_series_create(
    mode: ExecutionMode,
    pattern: RecurrencePattern,
    start: &str,
    end: &str,
    args: BookingArgs,
    json_output: bool,
) -> Result<()> {
    let range_start = parse_instant(start)?;
    let range_end = parse_instant(end)?;
    let mut template = SeriesTemplate::new(&args.client)
        .with_services(args.service_entries())
        .with_duration(args.duration_minutes());
    template.owner = args.owner.clone();
    template.resource = args.resource.clone();
    template.notes = args.notes.clone();
    template.color = args.color.clone();

    let outcome = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let outcome = store
                .scheduler
                .create_series(&template, pattern, range_start, range_end)
                .await?;
            store.persist().await?;
            outcome
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler
                .create_series(&template, pattern, range_start, range_end)
                .await?
        }
    };
    output::print_series_outcome(&outcome, json_output);
    Ok(())
}

/// Run the series-delete command.
pub async fn run_series_delete(mode: ExecutionMode, id: &str, json_output: bool) -> Result<()> {
    match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.delete_series(id).await?;
            store.persist().await?;
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.delete_series(id).await?;
        }
    }
    output::print_done(&format!("Deleted series {} (items detached)", id), json_output);
    Ok(())
}

/// Run the resources-list command.
pub async fn run_resources_list(mode: ExecutionMode, json_output: bool) -> Result<()> {
    let resources = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.resources().await
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.resources().await
        }
    };
    output::print_resources(&resources, json_output);
    Ok(())
}

/// Run the resources-create command.
pub async fn run_resources_create(
    mode: ExecutionMode,
    name: &str,
    kind: ResourceKind,
    json_output: bool,
) -> Result<()> {
    let resource = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let resource = store.scheduler.create_resource(name, kind).await?;
            store.persist().await?;
            resource
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.create_resource(name, kind).await?
        }
    };
    output::print_done(
        &format!("Created resource {} ({})", resource.name, resource.id),
        json_output,
    );
    Ok(())
}

/// Run the resources-deactivate command.
pub async fn run_resources_deactivate(
    mode: ExecutionMode,
    id: &str,
    json_output: bool,
) -> Result<()> {
    let update = ResourceUpdate {
        active: Some(false),
        ..Default::default()
    };
    match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.update_resource(id, update).await?;
            store.persist().await?;
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.update_resource(id, update).await?;
        }
    }
    output::print_done(&format!("Deactivated resource {}", id), json_output);
    Ok(())
}

/// Run the resources-delete command.
pub async fn run_resources_delete(
    mode: ExecutionMode,
    id: &str,
    json_output: bool,
) -> Result<()> {
    match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.delete_resource(id).await?;
            store.persist().await?;
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.delete_resource(id).await?;
        }
    }
    output::print_done(&format!("Deleted resource {}", id), json_output);
    Ok(())
}

/// Run the feed command: dump the calendar widget feed.
pub async fn run_feed(mode: ExecutionMode, json_output: bool) -> Result<()> {
    let items = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            store.scheduler.items().await
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.items().await
        }
    };
    output::print_feed(&feed::feed(items.iter()), json_output);
    Ok(())
}

/// Run session login: install and persist a user.
pub fn run_session_login(
    config: &Config,
    id: &str,
    name: &str,
    role: Role,
    json_output: bool,
) -> Result<()> {
    let path = config.session_file();
    let mut session = Session::load(&path);
    session.login(User::new(id, name, role));
    session.save(&path)?;
    output::print_session(&session, json_output);
    Ok(())
}

/// Run session logout: tear the session down and persist.
pub fn run_session_logout(config: &Config, json_output: bool) -> Result<()> {
    let path = config.session_file();
    let mut session = Session::load(&path);
    session.logout();
    session.save(&path)?;
    output::print_session(&session, json_output);
    Ok(())
}

/// Run session show.
pub fn run_session_show(config: &Config, json_output: bool) -> Result<()> {
    let session = Session::load(config.session_file());
    output::print_session(&session, json_output);
    Ok(())
}

/// Build an [`ItemUpdate`] from optional CLI fields.
pub fn build_update(
    start: Option<&str>,
    end: Option<&str>,
    owner: Option<String>,
    notes: Option<String>,
) -> Result<ItemUpdate> {
    Ok(ItemUpdate {
        start: start.map(parse_instant).transpose()?,
        end: end.map(parse_instant).transpose()?,
        owner,
        notes,
        ..Default::default()
    })
}

/// Run the update command: a partial edit of one item.
pub async fn run_update(
    mode: ExecutionMode,
    id: &str,
    update: ItemUpdate,
    json_output: bool,
) -> Result<()> {
    let updated = match mode {
        ExecutionMode::Local(config) => {
            let store = local::LocalStore::open(&config).await?;
            let updated = store.scheduler.update(id, update).await?;
            store.persist().await?;
            updated
        }
        ExecutionMode::Remote { config, url } => {
            let scheduler = remote::connect(&config, url.as_deref())?;
            scheduler.refresh().await?;
            scheduler.update(id, update).await?
        }
    };
    output::print_item(&updated, json_output);
    Ok(())
}
