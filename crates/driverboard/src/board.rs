//! The driver board controller.
//!
//! [`DriverBoard`] owns the request → render → action → request → re-render
//! loop. It holds no authoritative state: after every successful mutation the
//! full list is fetched again and the container's contents are replaced.
//!
//! Controls are not wired one by one. Every rendered control carries
//! `data-action` / `data-driver-id` attributes; the host forwards events from
//! the list container through [`BoardEvent::delegate`] and
//! [`DriverBoard::dispatch`].
//!
//! When a request fails the board keeps its list, its edit drafts and the
//! form's values, renders a notice describing the failure, and returns the
//! error to the caller.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::DriverApi;
use crate::driver::{CreatedAt, Driver, DriverFields, DriverId, DriverPayload, Field};
use crate::error::{Error, Result};
use crate::form::DriverForm;
use crate::view::{html, BoardView, CardView};

/// The element the driver list is rendered into.
pub trait Container: Send {
    /// Replace the container's entire contents.
    fn replace(&mut self, markup: &str);

    /// Remove all contents.
    fn clear(&mut self) {
        self.replace("");
    }
}

/// A [`Container`] that keeps the last markup in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlContainer {
    markup: String,
    renders: usize,
}

impl HtmlContainer {
    /// An empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current contents.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// How many times the contents have been replaced.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl Container for HtmlContainer {
    fn replace(&mut self, markup: &str) {
        markup.clone_into(&mut self.markup);
        self.renders += 1;
    }
}

/// Source of the current time, used for new records and relative times.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// A user action on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Delete control clicked.
    Delete(DriverId),
    /// Edit control clicked.
    Edit(DriverId),
    /// Save control clicked.
    Save(DriverId),
    /// Keystroke in an editing card's input.
    EditInput {
        /// Card being edited.
        id: DriverId,
        /// Which input.
        field: Field,
        /// The input's new value.
        value: String,
    },
    /// Keystroke in a creation form input.
    FormInput {
        /// Input name.
        name: String,
        /// The input's new value.
        value: String,
    },
    /// Creation form submitted.
    Submit,
}

/// Attributes of the element an event originated from.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTarget<'a> {
    /// `data-action`
    pub action: Option<&'a str>,
    /// `data-driver-id`
    pub driver_id: Option<&'a str>,
    /// `name`
    pub name: Option<&'a str>,
    /// Current value, for inputs.
    pub value: Option<&'a str>,
}

impl BoardEvent {
    /// Decode an event bubbled up to the list container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] if the target has no recognised
    /// action, or its driver id or input name is missing or malformed.
    pub fn delegate(target: EventTarget<'_>) -> Result<Self> {
        let action = target
            .action
            .ok_or_else(|| Error::invalid_event("target has no data-action"))?;

        let id = || -> Result<DriverId> {
            let raw = target
                .driver_id
                .ok_or_else(|| Error::invalid_event(format!("'{action}' without data-driver-id")))?;
            raw.parse()
                .map_err(|_| Error::invalid_event(format!("bad data-driver-id '{raw}'")))
        };

        match action {
            "delete" => Ok(Self::Delete(id()?)),
            "edit" => Ok(Self::Edit(id()?)),
            "save" => Ok(Self::Save(id()?)),
            "input" => {
                let name = target
                    .name
                    .ok_or_else(|| Error::invalid_event("input without a name"))?;
                let field = Field::from_input_name(name)
                    .ok_or_else(|| Error::invalid_event(format!("unknown input '{name}'")))?;
                Ok(Self::EditInput {
                    id: id()?,
                    field,
                    value: target.value.unwrap_or_default().to_string(),
                })
            }
            other => Err(Error::invalid_event(format!("unknown action '{other}'"))),
        }
    }
}

/// View controller for the driver list.
pub struct DriverBoard<A, C> {
    api: A,
    container: C,
    form: DriverForm,
    clock: Box<dyn Clock>,
    drivers: Vec<Driver>,
    drafts: HashMap<DriverId, DriverFields>,
    notice: Option<String>,
}

impl<A, C> fmt::Debug for DriverBoard<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverBoard")
            .field("drivers", &self.drivers.len())
            .field("editing", &self.drafts.keys().collect::<Vec<_>>())
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl<A, C> DriverBoard<A, C>
where
    A: DriverApi,
    C: Container,
{
    /// Create a board without loading anything.
    pub fn new(api: A, container: C, form: DriverForm, clock: impl Clock + 'static) -> Self {
        Self {
            api,
            container,
            form,
            clock: Box::new(clock),
            drivers: Vec::new(),
            drafts: HashMap::new(),
            notice: None,
        }
    }

    /// Create a board and perform the first load.
    ///
    /// A failed first load is not fatal: the board is returned showing the
    /// failure notice.
    pub async fn mount(api: A, container: C, form: DriverForm, clock: impl Clock + 'static) -> Self {
        let mut board = Self::new(api, container, form, clock);
        if let Err(err) = board.load_and_render().await {
            debug!("Initial load failed: {}", err);
        }
        board
    }

    /// Clear the container and hand the container and form back.
    pub fn unmount(mut self) -> (C, DriverForm) {
        self.container.clear();
        (self.container, self.form)
    }

    /// Fetch every driver and replace the container's contents.
    ///
    /// Any cards being edited return to display mode.
    ///
    /// # Errors
    ///
    /// Returns the request error after rendering it as a notice.
    pub async fn load_and_render(&mut self) -> Result<()> {
        match self.api.list().await {
            Ok(drivers) => {
                debug!("Loaded {} drivers", drivers.len());
                self.drivers = drivers;
                self.drafts.clear();
                self.notice = None;
                self.render();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Render one driver's card with the board's clock and drafts.
    #[must_use]
    pub fn render_card(&self, driver: &Driver) -> String {
        html::render_card(&CardView {
            id: driver.id,
            fields: driver.fields(),
            created_ago: crate::view::relative::time_ago(driver.created_at.instant(), self.clock.now()),
            draft: self.drafts.get(&driver.id).cloned(),
        })
    }

    /// Delete a driver, then reload.
    ///
    /// # Errors
    ///
    /// Returns the request error after rendering it as a notice.
    pub async fn on_delete(&mut self, id: DriverId) -> Result<()> {
        if let Err(err) = self.api.delete(id).await {
            return Err(self.fail(err));
        }
        info!("Deleted driver {}", id);
        self.load_and_render().await
    }

    /// Switch a card to editing, pre-filled with its displayed values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDriver`] if the driver is not on the board.
    pub fn on_edit(&mut self, id: DriverId) -> Result<()> {
        let driver = self.driver(id)?;
        let fields = driver.fields();
        self.drafts.entry(id).or_insert(fields);
        debug!("Editing driver {}", id);
        self.render();
        Ok(())
    }

    /// Record a keystroke into an editing card's input.
    ///
    /// Input for a card that is not being edited is ignored. The container is
    /// not re-rendered; the input already shows the value.
    pub fn on_edit_input(&mut self, id: DriverId, field: Field, value: impl Into<String>) {
        match self.drafts.get_mut(&id) {
            Some(draft) => draft.set(field, value),
            None => debug!("Ignoring input for driver {} (not editing)", id),
        }
    }

    /// Send an editing card's values, keeping its original creation time,
    /// then reload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEditing`] or [`Error::UnknownDriver`] for local
    /// problems, or the request error after rendering it as a notice.
    pub async fn on_save(&mut self, id: DriverId) -> Result<()> {
        let draft = self
            .drafts
            .get(&id)
            .cloned()
            .ok_or(Error::NotEditing { id })?;
        let created_at = self.driver(id)?.created_at.clone();

        let payload = DriverPayload::new(draft, created_at);
        if let Err(err) = self.api.update(id, &payload).await {
            return Err(self.fail(err));
        }
        info!("Updated driver {}", id);
        self.load_and_render().await
    }

    /// Record a value into a named creation form input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormInput`] if the form has no such input.
    pub fn on_form_input(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.form.set(name, value)
    }

    /// Create a driver from the form's values, stamped with the current time,
    /// then clear the form and reload.
    ///
    /// # Errors
    ///
    /// Returns the request error after rendering it as a notice. The form
    /// keeps its values on failure.
    pub async fn on_create_submit(&mut self) -> Result<()> {
        let payload = DriverPayload::new(
            self.form.values().clone(),
            CreatedAt::new(self.clock.now()),
        );
        match self.api.create(&payload).await {
            Ok(created) => info!("Created driver {}", created.id),
            Err(err) => return Err(self.fail(err)),
        }
        self.form.reset();
        self.load_and_render().await
    }

    /// Route an event to its handler.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler returns.
    pub async fn dispatch(&mut self, event: BoardEvent) -> Result<()> {
        match event {
            BoardEvent::Delete(id) => self.on_delete(id).await,
            BoardEvent::Edit(id) => self.on_edit(id),
            BoardEvent::Save(id) => self.on_save(id).await,
            BoardEvent::EditInput { id, field, value } => {
                self.on_edit_input(id, field, value);
                Ok(())
            }
            BoardEvent::FormInput { name, value } => self.on_form_input(&name, value),
            BoardEvent::Submit => self.on_create_submit().await,
        }
    }

    /// The view model for the current state.
    #[must_use]
    pub fn view(&self) -> BoardView {
        BoardView::build(
            &self.drivers,
            &self.drafts,
            self.notice.as_deref(),
            self.clock.now(),
        )
    }

    /// Replace the container's contents with the current state.
    pub fn render(&mut self) {
        let markup = html::render_board(&self.view());
        self.container.replace(&markup);
    }

    /// Drivers from the last successful load, in backend order.
    #[must_use]
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Whether a card is in editing mode.
    #[must_use]
    pub fn is_editing(&self, id: DriverId) -> bool {
        self.drafts.contains_key(&id)
    }

    /// The current input values of an editing card.
    #[must_use]
    pub fn draft(&self, id: DriverId) -> Option<&DriverFields> {
        self.drafts.get(&id)
    }

    /// Description of the last failed request, until the next successful load.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The creation form.
    #[must_use]
    pub fn form(&self) -> &DriverForm {
        &self.form
    }

    /// The list container.
    #[must_use]
    pub fn container(&self) -> &C {
        &self.container
    }

    fn driver(&self, id: DriverId) -> Result<&Driver> {
        self.drivers
            .iter()
            .find(|d| d.id == id)
            .ok_or(Error::UnknownDriver { id })
    }

    fn fail(&mut self, err: Error) -> Error {
        warn!("Request failed: {}", err);
        self.notice = Some(err.to_string());
        self.render();
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, Mutex};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[derive(Debug, Default)]
    struct Backend {
        drivers: Vec<Driver>,
        next_id: u64,
        fail: bool,
        updates: Vec<(DriverId, DriverPayload)>,
    }

    /// In-memory backend shared between the test and the board.
    #[derive(Debug, Clone, Default)]
    struct FakeApi(Arc<Mutex<Backend>>);

    impl FakeApi {
        fn with(drivers: Vec<Driver>) -> Self {
            let next_id = drivers.iter().map(|d| d.id.0).max().unwrap_or(0) + 1;
            Self(Arc::new(Mutex::new(Backend {
                drivers,
                next_id,
                ..Backend::default()
            })))
        }

        fn set_failing(&self, fail: bool) {
            self.0.lock().unwrap().fail = fail;
        }

        fn check(&self, endpoint: &str) -> Result<()> {
            if self.0.lock().unwrap().fail {
                return Err(Error::Api {
                    endpoint: endpoint.to_string(),
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DriverApi for FakeApi {
        async fn list(&self) -> Result<Vec<Driver>> {
            self.check("GET /drivers")?;
            Ok(self.0.lock().unwrap().drivers.clone())
        }

        async fn create(&self, payload: &DriverPayload) -> Result<Driver> {
            self.check("POST /drivers")?;
            let mut backend = self.0.lock().unwrap();
            let driver = Driver {
                id: DriverId(backend.next_id),
                name: payload.name.clone(),
                races_won: payload.races_won.clone(),
                fav_track: payload.fav_track.clone(),
                team_name: payload.team_name.clone(),
                photo_url: payload.photo_url.clone(),
                created_at: payload.created_at.clone(),
            };
            backend.next_id += 1;
            backend.drivers.push(driver.clone());
            Ok(driver)
        }

        async fn update(&self, id: DriverId, payload: &DriverPayload) -> Result<Driver> {
            self.check("PUT /drivers/:id")?;
            let mut backend = self.0.lock().unwrap();
            backend.updates.push((id, payload.clone()));
            let driver = backend
                .drivers
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or(Error::UnknownDriver { id })?;
            driver.name = payload.name.clone();
            driver.races_won = payload.races_won.clone();
            driver.fav_track = payload.fav_track.clone();
            driver.team_name = payload.team_name.clone();
            driver.photo_url = payload.photo_url.clone();
            driver.created_at = payload.created_at.clone();
            Ok(driver.clone())
        }

        async fn delete(&self, id: DriverId) -> Result<()> {
            self.check("DELETE /drivers/:id")?;
            self.0.lock().unwrap().drivers.retain(|d| d.id != id);
            Ok(())
        }
    }

    fn driver(id: u64, name: &str) -> Driver {
        Driver {
            id: DriverId(id),
            name: name.to_string(),
            races_won: "7".into(),
            fav_track: "Imola".to_string(),
            team_name: "Team Z".to_string(),
            photo_url: format!("http://img.test/{id}.png"),
            created_at: CreatedAt::new(now() - Duration::days(3)),
        }
    }

    async fn board(api: &FakeApi) -> DriverBoard<FakeApi, HtmlContainer> {
        crate::logging::init_test_logging();
        DriverBoard::mount(api.clone(), HtmlContainer::new(), DriverForm::new(), now).await
    }

    #[tokio::test]
    async fn test_mount_empty_shows_empty_state() {
        let api = FakeApi::default();
        let board = board(&api).await;

        let markup = board.container().markup();
        assert!(markup.contains("Hey, the registry is empty."));
        assert!(!markup.contains("js-driver-item"));
    }

    #[tokio::test]
    async fn test_mount_renders_one_card_per_driver() {
        let api = FakeApi::with(vec![driver(1, "Alain"), driver(2, "Nigel"), driver(3, "Nelson")]);
        let board = board(&api).await;

        let markup = board.container().markup();
        assert_eq!(markup.matches("js-driver-item").count(), 3);
        assert_eq!(markup.matches("3 days ago").count(), 3);
        let alain = markup.find("Alain").unwrap();
        let nelson = markup.find("Nelson").unwrap();
        assert!(alain < nelson);
    }

    #[tokio::test]
    async fn test_delete_removes_card() {
        let api = FakeApi::with(vec![driver(1, "Alain"), driver(2, "Nigel")]);
        let mut board = board(&api).await;

        board.on_delete(DriverId(1)).await.unwrap();

        assert_eq!(board.drivers().len(), 1);
        assert!(!board.container().markup().contains("Alain"));
        assert!(board.container().markup().contains("Nigel"));
    }

    #[tokio::test]
    async fn test_edit_prefills_from_displayed_values() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let mut board = board(&api).await;

        board.on_edit(DriverId(1)).unwrap();

        assert!(board.is_editing(DriverId(1)));
        let draft = board.draft(DriverId(1)).unwrap();
        assert_eq!(draft.name, "Alain");
        assert_eq!(draft.photo_url, "http://img.test/1.png");
        let markup = board.container().markup();
        assert!(markup.contains("js-save-button"));
        assert!(!markup.contains("js-edit-button"));
    }

    #[tokio::test]
    async fn test_edit_unknown_driver() {
        let api = FakeApi::default();
        let mut board = board(&api).await;

        let err = board.on_edit(DriverId(42)).unwrap_err();
        assert!(matches!(err, Error::UnknownDriver { id } if id == DriverId(42)));
    }

    #[tokio::test]
    async fn test_save_keeps_created_at() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let mut board = board(&api).await;
        let created_at = board.drivers()[0].created_at.clone();

        board.on_edit(DriverId(1)).unwrap();
        board.on_edit_input(DriverId(1), Field::TeamName, "Team Y");
        board.on_edit_input(DriverId(1), Field::RacesWon, "51");
        board.on_save(DriverId(1)).await.unwrap();

        let saved = &board.drivers()[0];
        assert_eq!(saved.team_name, "Team Y");
        assert_eq!(saved.races_won.as_str(), "51");
        assert_eq!(saved.created_at, created_at);
        assert!(!board.is_editing(DriverId(1)));

        let backend = api.0.lock().unwrap();
        assert_eq!(backend.updates.len(), 1);
        assert_eq!(backend.updates[0].1.created_at, created_at);
    }

    #[tokio::test]
    async fn test_save_requires_editing() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let mut board = board(&api).await;

        let err = board.on_save(DriverId(1)).await.unwrap_err();
        assert!(matches!(err, Error::NotEditing { .. }));
    }

    #[tokio::test]
    async fn test_input_ignored_when_not_editing() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let mut board = board(&api).await;

        board.on_edit_input(DriverId(1), Field::Name, "X");
        assert!(board.draft(DriverId(1)).is_none());
    }

    #[tokio::test]
    async fn test_create_submit_posts_and_clears_form() {
        let api = FakeApi::default();
        let mut board = board(&api).await;

        board.on_form_input("driverName", "Ayrton").unwrap();
        board.on_form_input("racesWon", "41").unwrap();
        board.on_form_input("favTrack", "Monaco").unwrap();
        board.on_form_input("teamName", "Team A").unwrap();
        board.on_form_input("photoURL", "http://x/y.png").unwrap();
        board.on_create_submit().await.unwrap();

        assert!(board.form().is_blank());
        let created = &board.drivers()[0];
        assert_eq!(created.name, "Ayrton");
        assert_eq!(created.races_won.as_str(), "41");
        assert_eq!(created.created_at.as_str(), "2024-06-15T12:00:00.000Z");
        assert!(board.container().markup().contains("less than a minute ago"));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft_and_shows_notice() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let mut board = board(&api).await;

        board.on_edit(DriverId(1)).unwrap();
        board.on_edit_input(DriverId(1), Field::Name, "Prost");
        api.set_failing(true);

        let err = board.on_save(DriverId(1)).await.unwrap_err();
        assert!(err.is_request_failure());
        assert!(board.is_editing(DriverId(1)));
        assert_eq!(board.draft(DriverId(1)).unwrap().name, "Prost");
        assert!(board.notice().unwrap().contains("503"));
        assert!(board.container().markup().contains("js-notice"));
        assert_eq!(board.drivers().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form() {
        let api = FakeApi::default();
        let mut board = board(&api).await;
        board.on_form_input("driverName", "Ayrton").unwrap();
        api.set_failing(true);

        assert!(board.on_create_submit().await.is_err());
        assert_eq!(board.form().value(Field::Name), "Ayrton");
    }

    #[tokio::test]
    async fn test_successful_load_clears_notice() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        api.set_failing(true);
        let mut board = board(&api).await;
        assert!(board.notice().is_some());

        api.set_failing(false);
        board.load_and_render().await.unwrap();
        assert!(board.notice().is_none());
        assert!(!board.container().markup().contains("js-notice"));
    }

    #[tokio::test]
    async fn test_dispatch_delegated_events() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let mut board = board(&api).await;

        let edit = BoardEvent::delegate(EventTarget {
            action: Some("edit"),
            driver_id: Some("1"),
            ..EventTarget::default()
        })
        .unwrap();
        board.dispatch(edit).await.unwrap();

        let input = BoardEvent::delegate(EventTarget {
            action: Some("input"),
            driver_id: Some("1"),
            name: Some("driverName"),
            value: Some("Prost"),
        })
        .unwrap();
        board.dispatch(input).await.unwrap();

        let save = BoardEvent::delegate(EventTarget {
            action: Some("save"),
            driver_id: Some("1"),
            ..EventTarget::default()
        })
        .unwrap();
        board.dispatch(save).await.unwrap();

        assert_eq!(board.drivers()[0].name, "Prost");
    }

    #[test]
    fn test_delegate_rejects_bad_targets() {
        assert!(BoardEvent::delegate(EventTarget::default()).is_err());
        assert!(BoardEvent::delegate(EventTarget {
            action: Some("delete"),
            ..EventTarget::default()
        })
        .is_err());
        assert!(BoardEvent::delegate(EventTarget {
            action: Some("delete"),
            driver_id: Some("one"),
            ..EventTarget::default()
        })
        .is_err());
        assert!(BoardEvent::delegate(EventTarget {
            action: Some("launch"),
            driver_id: Some("1"),
            ..EventTarget::default()
        })
        .is_err());
    }

    #[test]
    fn test_delegate_delete() {
        let event = BoardEvent::delegate(EventTarget {
            action: Some("delete"),
            driver_id: Some("8"),
            ..EventTarget::default()
        })
        .unwrap();
        assert_eq!(event, BoardEvent::Delete(DriverId(8)));
    }

    #[tokio::test]
    async fn test_unmount_clears_container() {
        let api = FakeApi::with(vec![driver(1, "Alain")]);
        let board = board(&api).await;

        let (container, form) = board.unmount();
        assert_eq!(container.markup(), "");
        assert!(form.is_blank());
    }

    #[tokio::test]
    async fn test_render_card_uses_clock() {
        let api = FakeApi::default();
        let board = board(&api).await;

        let html = board.render_card(&driver(5, "Mika"));
        assert!(html.contains("3 days ago"));
        assert!(html.contains(r#"data-driver-id="5""#));
    }
}
