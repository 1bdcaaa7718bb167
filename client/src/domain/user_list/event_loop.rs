//! Single-task event loop owning the screen state.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{Command, UserListConfig, UserListHandle, UserListRuntime, UserListView};
use crate::domain::debounce::{DebounceState, DebounceTicket};
use crate::domain::ports::{UserDirectorySource, UserDirectorySourceError};
use crate::domain::synchronizer::{
    FetchCompletion, FetchTicket, FetchedRecords, ListSynchronizer, fetch_records,
};
use crate::domain::{ChildMessage, ResourceKind, SearchFilter, User, UserId};

/// Parent screen state machine.
///
/// Constructed and driven only through [`UserListScreen::spawn`]; the
/// returned [`UserListHandle`] is the sole way to reach it.
pub struct UserListScreen {
    sync: ListSynchronizer,
    search: SearchFilter,
    selected: Option<User>,
    last_child_message: Option<ChildMessage>,
    source: Arc<dyn UserDirectorySource>,
    runtime: UserListRuntime,
    commands: mpsc::UnboundedReceiver<Command>,
    loopback: mpsc::WeakUnboundedSender<Command>,
    view: watch::Sender<UserListView>,
    fetch_task: Option<JoinHandle<()>>,
    debounce_task: Option<JoinHandle<()>>,
}

impl UserListScreen {
    /// Start the screen's event loop on the current Tokio runtime.
    ///
    /// The loop stops on [`UserListHandle::shutdown`] or once every handle
    /// (and every details child) has been dropped.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn(
        source: Arc<dyn UserDirectorySource>,
        config: UserListConfig,
        runtime: UserListRuntime,
    ) -> UserListHandle {
        let (sender, commands) = mpsc::unbounded_channel();
        let initial = UserListView {
            resource: config.initial_resource,
            ..UserListView::default()
        };
        let (view, receiver) = watch::channel(initial);
        let screen = Self {
            sync: ListSynchronizer::new(config.initial_resource),
            search: SearchFilter::new(config.debounce_window),
            selected: None,
            last_child_message: None,
            source,
            runtime,
            commands,
            loopback: sender.downgrade(),
            view,
            fetch_task: None,
            debounce_task: None,
        };
        tokio::spawn(screen.run());
        UserListHandle {
            commands: sender,
            view: receiver,
        }
    }

    async fn run(mut self) {
        info!(
            resource = %self.sync.active_resource(),
            debounce_window = ?self.search.window(),
            "user list screen started"
        );
        while let Some(command) = self.commands.recv().await {
            if let ControlFlow::Break(ack) = self.handle(command) {
                self.teardown();
                if ack.send(()).is_err() {
                    debug!("shutdown requester went away before acknowledgement");
                }
                return;
            }
        }
        self.teardown();
    }

    fn handle(&mut self, command: Command) -> ControlFlow<oneshot::Sender<()>> {
        match command {
            Command::SelectResource(kind) => self.select_resource(kind),
            Command::Fetch => self.start_fetch(),
            Command::SetQuery(text) => self.schedule_query(text),
            Command::DebounceElapsed(ticket) => self.apply_query(ticket),
            Command::SelectUser(id) => self.select_user(id),
            Command::ChildMessage(message) => self.record_child_message(message),
            Command::FetchCompleted { ticket, result } => self.complete_fetch(ticket, result),
            Command::Shutdown(ack) => return ControlFlow::Break(ack),
        }
        self.publish();
        ControlFlow::Continue(())
    }

    fn select_resource(&mut self, kind: ResourceKind) {
        if self.sync.select_resource(kind).is_some() {
            abort(&mut self.fetch_task);
        }
    }

    fn start_fetch(&mut self) {
        let (ticket, superseded) = self.sync.begin_fetch();
        if superseded.is_some() {
            abort(&mut self.fetch_task);
        }
        let source = Arc::clone(&self.source);
        let loopback = self.loopback.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let result = fetch_records(source.as_ref(), ticket.kind()).await;
            post(&loopback, Command::FetchCompleted { ticket, result });
        }));
    }

    fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchedRecords, UserDirectorySourceError>,
    ) {
        match self.sync.complete(ticket, result) {
            FetchCompletion::Stale { .. } => {}
            FetchCompletion::Applied {
                kind: ResourceKind::Users,
                ..
            } => {
                self.fetch_task = None;
                self.refresh_selection();
            }
            FetchCompletion::Applied { .. } | FetchCompletion::Failed { .. } => {
                self.fetch_task = None;
            }
        }
    }

    fn schedule_query(&mut self, text: String) {
        let ticket = self.search.set_query(text, self.runtime.clock.utc());
        abort(&mut self.debounce_task);
        let sleeper = Arc::clone(&self.runtime.sleeper);
        let window = self.search.window();
        let loopback = self.loopback.clone();
        self.debounce_task = Some(tokio::spawn(async move {
            sleeper.sleep(window).await;
            post(&loopback, Command::DebounceElapsed(ticket));
        }));
    }

    fn apply_query(&mut self, ticket: DebounceTicket) {
        if self.search.fire(ticket) {
            self.debounce_task = None;
            debug!(query = self.search.applied_query(), "search query applied");
        }
    }

    fn select_user(&mut self, id: Option<UserId>) {
        self.selected = id.and_then(|wanted| {
            self.sync
                .users()
                .iter()
                .find(|user| user.id() == wanted)
                .cloned()
        });
        if let (Some(wanted), None) = (id, &self.selected) {
            debug!(user_id = %wanted, "selected user is not in the collection");
        }
    }

    fn refresh_selection(&mut self) {
        let current = self.selected.as_ref().map(User::id);
        self.select_user(current);
    }

    fn record_child_message(&mut self, message: ChildMessage) {
        info!(message = %message, "message from child");
        self.last_child_message = Some(message);
    }

    fn publish(&self) {
        let users = self.sync.users();
        let next = UserListView {
            resource: self.sync.active_resource(),
            status: self.sync.status().clone(),
            filtered_users: Arc::from(self.search.current_filtered_view(&users)),
            users,
            posts: self.sync.posts(),
            query: self.search.applied_query().to_owned(),
            pending_deadline: match self.search.pending() {
                DebounceState::Pending { deadline, .. } => Some(deadline),
                DebounceState::Idle => None,
            },
            selected_user: self.selected.clone(),
            last_child_message: self.last_child_message.clone(),
        };
        self.view.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn teardown(&mut self) {
        let query_cancelled = self.search.cancel();
        abort(&mut self.debounce_task);
        let fetch_cancelled = self.sync.in_flight().map(FetchTicket::generation);
        abort(&mut self.fetch_task);
        info!(
            query_cancelled,
            fetch_cancelled = ?fetch_cancelled,
            "user list screen stopped"
        );
    }
}

fn abort(task: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}

fn post(loopback: &mpsc::WeakUnboundedSender<Command>, command: Command) {
    let Some(sender) = loopback.upgrade() else {
        return;
    };
    if sender.send(command).is_err() {
        debug!("user list screen stopped before a task reported back");
    }
}
