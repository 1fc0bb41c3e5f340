use std::sync::Arc;

use marketdesk_core::{AppResult, RecordId};
use marketdesk_domain::{Area, AreaInput, Governorate, governorate_name};

use crate::list_store::{FetchFailurePolicy, ListStore, LoadOutcome};
use crate::resource_screen::{ResourceScreen, ScreenOptions, load_with_notice};
use crate::screen_ports::{ListScope, Notifier, RecordSource, ResourceGateway};
use crate::session::AdminSession;

/// Query parameter selecting the governorate whose areas are listed.
pub const GOVERNORATE_SCOPE_KEY: &str = "governorate_id";

/// Area with its governorate name resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRow {
    /// The area record.
    pub area: Area,
    /// Localized governorate name, when the lookup has it.
    pub governorate: Option<String>,
}

/// Delivery-area screen: governorate picker plus the areas of the selection.
pub struct AreaScreen {
    areas: ResourceScreen<Area>,
    governorates: ListStore<Governorate>,
    governorate_source: Arc<dyn RecordSource<Governorate>>,
    notifier: Arc<dyn Notifier>,
    session: AdminSession,
    selected: Option<RecordId>,
}

impl AreaScreen {
    /// Creates the screen with nothing selected.
    #[must_use]
    pub fn new(
        area_gateway: Arc<dyn ResourceGateway<Area>>,
        governorate_source: Arc<dyn RecordSource<Governorate>>,
        notifier: Arc<dyn Notifier>,
        session: AdminSession,
        options: ScreenOptions,
    ) -> Self {
        Self {
            areas: ResourceScreen::new(area_gateway, Arc::clone(&notifier), session.clone(), options),
            governorates: ListStore::new(FetchFailurePolicy::KeepPrevious),
            governorate_source,
            notifier,
            session,
            selected: None,
        }
    }

    /// Returns the area sub-screen.
    #[must_use]
    pub fn areas(&self) -> &ResourceScreen<Area> {
        &self.areas
    }

    /// Returns the area sub-screen for view-state changes.
    pub fn areas_mut(&mut self) -> &mut ResourceScreen<Area> {
        &mut self.areas
    }

    /// Returns the governorate lookup list.
    #[must_use]
    pub fn governorates(&self) -> &ListStore<Governorate> {
        &self.governorates
    }

    /// Returns the selected governorate.
    #[must_use]
    pub fn selected(&self) -> Option<RecordId> {
        self.selected
    }

    /// Fetches the governorate lookup.
    pub async fn load_governorates(&self) -> AppResult<LoadOutcome> {
        load_with_notice(
            &self.governorates,
            self.governorate_source.as_ref(),
            &ListScope::all(),
            self.notifier.as_ref(),
            &self.session,
        )
        .await
    }

    /// Selects a governorate and fetches its areas.
    pub async fn select_governorate(&mut self, id: RecordId) -> AppResult<LoadOutcome> {
        self.selected = Some(id);
        self.areas
            .set_scope(ListScope::all().with(GOVERNORATE_SCOPE_KEY, id));
        self.areas.load().await
    }

    /// Creates an area in the selected governorate when the form leaves it unset.
    pub async fn create(&self, mut input: AreaInput) -> AppResult<Area> {
        if let Some(selected) = self.selected
            && input.governorate_id.value() == 0
        {
            input.governorate_id = selected;
        }
        self.areas.create(input).await
    }

    /// Returns visible areas with governorate names resolved.
    pub async fn rows(&self) -> Vec<AreaRow> {
        let language = self.session.language().await;
        let governorates = self.governorates.snapshot().await;
        self.areas
            .view()
            .await
            .into_iter()
            .map(|area| {
                let governorate = governorate_name(&governorates, area.governorate_id, language)
                    .map(str::to_owned);
                AreaRow { area, governorate }
            })
            .collect()
    }

    /// Detaches both lists.
    pub async fn close(&self) {
        self.areas.close().await;
        self.governorates.detach().await;
    }
}
