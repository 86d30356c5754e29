//! The visual controller: host lifecycle, data flow and intent processing.
//!
//! Per refresh the host pushes a data view through [`VisualController::update`]:
//! the payload is normalized, the host-declared settings override is merged,
//! the selection is reset and the view is re-rendered. User interaction flows
//! the other way: the rendered view maps UI events to intents, which are
//! queued on the controller's channel and consumed by
//! [`VisualController::process_pending`].

use crate::error::VisualError;
use crate::formatting::FormattingModel;
use crate::host::{HostServices, PersistRequest};
use crate::selection::{SelectionController, SelectionOutcome};
use crossbeam_channel::{unbounded, Receiver, Sender};
use gridvis_core::{
    normalize, Command, DataView, Event, FormattingSettings, GridMode, GridModel, Intent,
    RawInput, SelectionState, SettingsIntent, SettingsOverride, SettingsStore,
    VisualUpdateOptions,
};
use gridvis_widgets::{render, GridView, Widget};
use gridvis_yaml::Manifest;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Lifecycle of a visual instance.
///
/// Construction enters `Ready` directly; `destroy` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Accepting lifecycle calls
    Ready,
    /// Torn down; every later call is rejected
    Destroyed,
}

/// Messages consumed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A user intent from the rendered view
    Intent(Intent),
    /// A selection request finished
    SelectionResolved(SelectionOutcome),
}

impl From<Intent> for Message {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}

impl From<SelectionOutcome> for Message {
    fn from(outcome: SelectionOutcome) -> Self {
        Self::SelectionResolved(outcome)
    }
}

fn settings_message(intent: SettingsIntent) -> Message {
    Message::Intent(Intent::Settings(intent))
}

/// Async work handed back to the host glue. Feed the output to
/// [`VisualController::dispatch`] or the intent channel.
pub type PendingTask = Pin<Box<dyn Future<Output = Message> + Send>>;

/// Owns settings, the normalized model, selection and the rendered view of
/// one visual instance.
pub struct VisualController<H: HostServices> {
    host: Arc<H>,
    manifest: Manifest,
    store: SettingsStore,
    model: GridModel,
    selection: SelectionController,
    view: Option<GridView>,
    lifecycle: Lifecycle,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    render_count: u64,
}

impl<H: HostServices> VisualController<H> {
    /// Construct with the built-in manifest.
    pub fn new(host: Arc<H>) -> Self {
        Self::with_manifest(host, Manifest::builtin())
    }

    /// Construct with a custom manifest.
    pub fn with_manifest(host: Arc<H>, manifest: Manifest) -> Self {
        let (sender, receiver) = unbounded();
        let store = SettingsStore::new(manifest.default_settings());
        tracing::debug!(target: "gridvis::visual", visual = %manifest.visual, "visual constructed");
        Self {
            host,
            manifest,
            store,
            model: GridModel::default(),
            selection: SelectionController::new(),
            view: None,
            lifecycle: Lifecycle::Ready,
            sender,
            receiver,
            render_count: 0,
        }
    }

    // ===== Host lifecycle =====

    /// Refresh from a new data view.
    ///
    /// Rebuilds the model, merges the host override (or the manifest
    /// defaults when the host declares none), resets the selection and
    /// re-renders. Selections still in flight are invalidated.
    pub fn update(&mut self, options: &VisualUpdateOptions) -> Result<(), VisualError> {
        self.ensure_ready("update")?;

        let view = options.data_view();
        let model = normalize(RawInput::detect(view));
        let patch = view
            .and_then(|v| self.host.populate_formatting_settings(&self.manifest, v))
            .unwrap_or_else(|| SettingsOverride::from_persisted(self.manifest.defaults));
        let (title, subtitle) = self.resolve_headings(view, model.mode);

        let epoch = self.selection.reset();
        self.model = model;
        tracing::debug!(
            target: "gridvis::visual",
            mode = ?self.model.mode,
            columns = self.model.column_count(),
            rows = self.model.row_count(),
            epoch,
            "refresh"
        );

        let command = self
            .store
            .merge_host_override(patch.with_headings(title, subtitle))
            .map(settings_message);
        self.execute(command);
        Ok(())
    }

    /// Formatting model for the host settings pane.
    pub fn get_formatting_model(&self) -> Result<FormattingModel, VisualError> {
        self.ensure_ready("get_formatting_model")?;
        Ok(FormattingModel::build(&self.manifest, self.store.current_settings()))
    }

    /// Release the view. Terminal.
    pub fn destroy(&mut self) -> Result<(), VisualError> {
        self.ensure_ready("destroy")?;
        self.view = None;
        self.lifecycle = Lifecycle::Destroyed;
        let dropped = self.receiver.try_iter().count();
        tracing::debug!(target: "gridvis::visual", dropped, "visual destroyed");
        Ok(())
    }

    // ===== Intents =====

    /// Sender for queueing messages from the rendered view.
    pub fn intent_sender(&self) -> Sender<Message> {
        self.sender.clone()
    }

    /// Map a UI event through the current view and queue the resulting
    /// intent. Returns whether an intent was queued.
    pub fn handle_event(&self, event: &Event) -> bool {
        let Some(intent) = self.view.as_ref().and_then(|view| view.event(event)) else {
            return false;
        };
        tracing::trace!(target: "gridvis::visual", ?intent, "queued intent");
        self.sender.send(Message::Intent(intent)).is_ok()
    }

    /// Drain the queue. Returns the selection tasks started along the way.
    pub fn process_pending(&mut self) -> Result<Vec<PendingTask>, VisualError> {
        self.ensure_ready("process_pending")?;
        let mut tasks = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            tasks.extend(self.dispatch(message)?);
        }
        Ok(tasks)
    }

    /// Apply one message.
    pub fn dispatch(&mut self, message: Message) -> Result<Vec<PendingTask>, VisualError> {
        self.ensure_ready("dispatch")?;
        let command = match message {
            Message::Intent(Intent::Settings(intent)) => {
                tracing::trace!(target: "gridvis::visual", ?intent, "settings intent");
                self.store.dispatch(intent).map(settings_message)
            }
            Message::Intent(Intent::SelectRow(row)) => {
                match self
                    .selection
                    .select_row(self.host.as_ref(), &self.model, row)
                {
                    Ok(task) => Command::task(async move { Message::SelectionResolved(task.await) }),
                    Err(err) => {
                        tracing::warn!(target: "gridvis::visual", row, "selection dropped: {}", err);
                        Command::None
                    }
                }
            }
            Message::SelectionResolved(outcome) => {
                if self.selection.complete(outcome, self.model.row_count()) {
                    Command::Render
                } else {
                    Command::None
                }
            }
        };
        Ok(self.execute(command))
    }

    /// Register a callback run after every settings change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&FormattingSettings) + Send + Sync + 'static,
    {
        self.store.subscribe(callback);
    }

    // ===== Accessors =====

    /// Current lifecycle state.
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Current settings.
    pub const fn settings(&self) -> &FormattingSettings {
        self.store.current_settings()
    }

    /// Current normalized model.
    pub const fn model(&self) -> &GridModel {
        &self.model
    }

    /// Current selection.
    pub const fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Refresh epoch.
    pub const fn epoch(&self) -> u64 {
        self.selection.epoch()
    }

    /// Last rendered view.
    pub const fn view(&self) -> Option<&GridView> {
        self.view.as_ref()
    }

    /// Number of renders so far.
    pub const fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Manifest in use.
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Host capabilities.
    pub const fn host(&self) -> &Arc<H> {
        &self.host
    }

    // ===== Internals =====

    fn ensure_ready(&self, call: &'static str) -> Result<(), VisualError> {
        match self.lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Destroyed => {
                tracing::warn!(target: "gridvis::visual", call, "rejected call after destroy");
                Err(VisualError::Destroyed)
            }
        }
    }

    fn resolve_headings(&self, view: Option<&DataView>, mode: GridMode) -> (String, String) {
        let config = &self.manifest.headings;
        let defaults = self.manifest.headings_for(mode);
        let read = |property: &str| {
            view.and_then(|v| v.metadata.property_text(&config.object, property))
        };
        (
            read(&config.title_property).unwrap_or_else(|| defaults.title.clone()),
            read(&config.subtitle_property).unwrap_or_else(|| defaults.subtitle.clone()),
        )
    }

    fn execute(&mut self, command: Command<Message>) -> Vec<PendingTask> {
        let mut tasks = Vec::new();
        for command in command.into_vec() {
            match command {
                Command::Persist(settings) => {
                    tracing::trace!(target: "gridvis::visual", ?settings, "persist");
                    self.host.persist_properties(PersistRequest::settings(
                        self.manifest.settings_object.clone(),
                        &settings,
                    ));
                }
                Command::Render => self.render(),
                Command::Task(task) => tasks.push(task),
                Command::None | Command::Batch(_) => {}
            }
        }
        tasks
    }

    fn render(&mut self) {
        self.view = Some(render(
            &self.model,
            self.store.current_settings(),
            self.selection.state(),
        ));
        self.render_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::{SelectFuture, SelectionId};
    use futures::executor::block_on;
    use gridvis_core::{
        HierarchyLevels, Matrix, MatrixNode, Scaling, StyleFlag, Target, Theme,
    };
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        persisted: Mutex<Vec<PersistRequest>>,
    }

    impl RecordingHost {
        fn persist_count(&self) -> usize {
            self.persisted.lock().unwrap().len()
        }
    }

    impl HostServices for RecordingHost {
        fn create_selection_id(
            &self,
            node: &MatrixNode,
            _levels: &HierarchyLevels,
        ) -> Result<SelectionId, HostError> {
            Ok(SelectionId::new(node.label()))
        }

        fn select(&self, _id: SelectionId) -> SelectFuture {
            Box::pin(async { Ok(()) })
        }

        fn persist_properties(&self, request: PersistRequest) {
            self.persisted.lock().unwrap().push(request);
        }
    }

    fn matrix_options(rows: usize) -> VisualUpdateOptions {
        let mut matrix = Matrix::default();
        matrix.columns.root = MatrixNode::default()
            .child(MatrixNode::labelled("A"))
            .child(MatrixNode::labelled("B"));
        let mut root = MatrixNode::default();
        for i in 0..rows {
            root = root.child(MatrixNode::labelled(format!("r{i}")).value(0, 1_000.0 * i as f64));
        }
        matrix.rows.root = root;
        VisualUpdateOptions::single(DataView {
            matrix: Some(matrix),
            ..DataView::default()
        })
    }

    fn controller() -> (Arc<RecordingHost>, VisualController<RecordingHost>) {
        let host = Arc::new(RecordingHost::default());
        (host.clone(), VisualController::new(host))
    }

    #[test]
    fn test_construct_ready_without_data() {
        let (_, visual) = controller();
        assert_eq!(visual.lifecycle(), Lifecycle::Ready);
        assert!(visual.model().is_empty());
        assert!(visual.view().is_none());
        assert_eq!(visual.settings(), &FormattingSettings::default());
    }

    #[test]
    fn test_update_renders_matrix_with_defaults() {
        let (host, mut visual) = controller();
        visual.update(&matrix_options(3)).unwrap();

        assert_eq!(visual.model().row_count(), 3);
        assert_eq!(visual.settings().title, "Table");
        assert_eq!(visual.settings().subtitle, "Matrix");
        assert_eq!(visual.render_count(), 1);
        assert_eq!(visual.view().map(GridView::subtitle), Some("Matrix"));
        assert_eq!(host.persist_count(), 0);
    }

    #[test]
    fn test_update_reads_headings_from_metadata() {
        let (_, mut visual) = controller();
        let mut options = matrix_options(1);
        options.data_views[0].metadata.objects.insert(
            "demoSection".to_string(),
            json!({"title": "Sales", "subTitle": ""})
                .as_object()
                .cloned()
                .unwrap(),
        );
        visual.update(&options).unwrap();
        assert_eq!(visual.settings().title, "Sales");
        assert_eq!(visual.settings().subtitle, "Matrix");
    }

    #[test]
    fn test_event_to_persist_and_render() {
        let (host, mut visual) = controller();
        visual.update(&matrix_options(2)).unwrap();

        assert!(visual.handle_event(&Event::click(Target::StyleButton(StyleFlag::Bold))));
        assert!(visual.handle_event(&Event::change(Target::ScalingSelect, "thousands")));
        let tasks = visual.process_pending().unwrap();

        assert!(tasks.is_empty());
        assert!(visual.settings().bold);
        assert_eq!(visual.settings().scaling, Scaling::Thousands);
        assert_eq!(host.persist_count(), 2);
        assert_eq!(visual.render_count(), 3);
    }

    #[test]
    fn test_unmapped_event_not_queued() {
        let (_, mut visual) = controller();
        assert!(!visual.handle_event(&Event::click(Target::Row(0))));
        visual.update(&matrix_options(1)).unwrap();
        assert!(!visual.handle_event(&Event::change(Target::ThemeSelect, "sepia")));
    }

    #[test]
    fn test_selection_roundtrip() {
        let (_, mut visual) = controller();
        visual.update(&matrix_options(3)).unwrap();

        let tasks = visual.dispatch(Intent::SelectRow(1).into()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(visual.selection().selected_row_index, None);

        for task in tasks {
            let message = block_on(task);
            visual.dispatch(message).unwrap();
        }
        assert_eq!(visual.selection().selected_row_index, Some(1));
        assert_eq!(
            visual.view().and_then(|v| v.table().get_selected_row()),
            Some(1)
        );
    }

    #[test]
    fn test_refresh_discards_pending_selection() {
        let (_, mut visual) = controller();
        visual.update(&matrix_options(3)).unwrap();
        let tasks = visual.dispatch(Intent::SelectRow(2).into()).unwrap();

        visual.update(&matrix_options(2)).unwrap();
        for task in tasks {
            let message = block_on(task);
            visual.dispatch(message).unwrap();
        }
        assert_eq!(visual.selection().selected_row_index, None);
    }

    #[test]
    fn test_destroy_is_terminal() {
        let (_, mut visual) = controller();
        visual.update(&matrix_options(1)).unwrap();
        visual.destroy().unwrap();

        assert_eq!(visual.lifecycle(), Lifecycle::Destroyed);
        assert!(visual.view().is_none());
        assert_eq!(visual.update(&matrix_options(1)), Err(VisualError::Destroyed));
        assert_eq!(visual.get_formatting_model().err(), Some(VisualError::Destroyed));
        assert_eq!(visual.destroy(), Err(VisualError::Destroyed));
        assert!(visual.process_pending().is_err());
    }

    #[test]
    fn test_formatting_model_tracks_settings() {
        let (_, mut visual) = controller();
        visual
            .dispatch(Intent::theme(Theme::Dark).into())
            .unwrap();
        let model = visual.get_formatting_model().unwrap();
        assert_eq!(model.slice("theme").map(|s| &s.value), Some(&json!("dark")));
    }

    #[test]
    fn test_subscribers_notified() {
        let (_, mut visual) = controller();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        visual.subscribe(move |settings| sink.lock().unwrap().push(settings.theme));

        visual.dispatch(Intent::theme(Theme::Dark).into()).unwrap();
        visual.update(&VisualUpdateOptions::default()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Theme::Dark, Theme::Light]);
    }
}
