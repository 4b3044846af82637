use super::detail::DetailView;
use super::form::FormView;
use super::intent::{
    action_intent, ContainerId, InteractiveRequest, InvokeRequest, PageIntent, ViewIntent,
};
use super::list::ListView;
use super::viewport::PageSize;
use crate::extension::{Extension, Mode, ParameterBinding, Script, QUERY_PARAM};
use crate::protocol::{decode_output, PageBody};
use crate::runner::{build_invocation, ExecutionStrategy};
use crate::shared::PageError;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NeedsInput,
    Running,
    List,
    Detail,
    Error,
}

/// One script instance: its parameters, the view bound to its output and
/// the generation of the latest dispatched invocation.
#[derive(Debug, Clone)]
pub struct RunContainer {
    id: ContainerId,
    extension: String,
    dir: PathBuf,
    script_name: String,
    script: Script,
    params: ParameterBinding,
    state: RunState,
    form: Option<FormView>,
    list: Option<ListView>,
    detail: Option<DetailView>,
    failure: Option<DetailView>,
    generation: u64,
    in_flight: bool,
    size: PageSize,
}

impl RunContainer {
    pub fn new(
        id: ContainerId,
        extension: &Extension,
        script_name: impl Into<String>,
        script: &Script,
        params: ParameterBinding,
    ) -> Self {
        Self {
            id,
            extension: extension.name.clone(),
            dir: extension.dir.clone(),
            script_name: script_name.into(),
            script: script.clone(),
            params,
            state: RunState::Running,
            form: None,
            list: None,
            detail: None,
            failure: None,
            generation: 0,
            in_flight: false,
            size: PageSize::default(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn title(&self) -> &str {
        &self.script.title
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn params(&self) -> &ParameterBinding {
        &self.params
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn form(&self) -> Option<&FormView> {
        self.form.as_ref()
    }

    pub fn list(&self) -> Option<&ListView> {
        self.list.as_ref()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn failure(&self) -> Option<&DetailView> {
        self.failure.as_ref()
    }

    /// Text of the detail page currently on screen, if one is.
    pub fn displayed_text(&self) -> Option<&str> {
        match self.state {
            RunState::Error => self.failure.as_ref().map(DetailView::text),
            RunState::Detail => self.detail.as_ref().map(DetailView::text),
            _ => None,
        }
    }

    /// Prompts for missing parameters, or starts the first invocation when
    /// everything is bound.
    pub fn init(&mut self) -> Option<PageIntent> {
        let generator = self.script.mode == Mode::Generator;
        let missing = self
            .script
            .missing_params(&self.params)
            .into_iter()
            .filter(|item| !(generator && item.name == QUERY_PARAM))
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return self.run();
        }
        let mut form = FormView::new(self.script.title.clone(), missing);
        form.set_size(self.size);
        self.form = Some(form);
        self.state = RunState::NeedsInput;
        None
    }

    /// Dispatches a new invocation. Any in-flight one is superseded: its
    /// result will carry an older generation and be dropped on arrival.
    pub fn run(&mut self) -> Option<PageIntent> {
        if self.script.mode == Mode::Generator {
            let query = self
                .list
                .as_ref()
                .map(|list| list.query().to_string())
                .unwrap_or_default();
            self.params.insert(QUERY_PARAM, query);
        }

        let invocation =
            match build_invocation(&self.script_name, &self.script, &self.params, &self.dir) {
                Ok(invocation) => invocation,
                Err(err) => {
                    self.fail(err);
                    return None;
                }
            };

        if self.script.mode.is_list() {
            let title = self.script.title.clone();
            let dynamic = self.script.mode == Mode::Generator;
            let size = self.size;
            let list = self.list.get_or_insert_with(|| {
                let mut list = if dynamic {
                    ListView::dynamic(title)
                } else {
                    ListView::new(title)
                };
                list.set_size(size);
                list
            });
            list.set_loading(true);
        }

        self.generation += 1;
        self.in_flight = true;
        self.state = RunState::Running;
        match ExecutionStrategy::for_mode(&self.script.mode) {
            ExecutionStrategy::Captured => Some(PageIntent::Invoke(InvokeRequest {
                container: self.id,
                generation: self.generation,
                invocation,
            })),
            ExecutionStrategy::Interactive => Some(PageIntent::Interactive(InteractiveRequest {
                container: self.id,
                invocation,
            })),
        }
    }

    pub fn reload(&mut self, overrides: &ParameterBinding) -> Option<PageIntent> {
        if matches!(self.state, RunState::Error | RunState::NeedsInput) {
            return None;
        }
        self.params.merge(overrides);
        self.run()
    }

    /// Applies the output of generation `generation`. Returns `false` when
    /// the result is stale and was dropped.
    pub fn apply_result(&mut self, generation: u64, result: Result<Vec<u8>, PageError>) -> bool {
        if generation != self.generation || self.state == RunState::Error {
            return false;
        }
        self.in_flight = false;

        let page = result.and_then(|output| {
            decode_output(
                &self.script.mode,
                &self.extension,
                &self.script.title,
                &output,
            )
        });
        match page {
            Ok(page) => match page.body {
                PageBody::List { items } => {
                    let title = page.title;
                    let size = self.size;
                    let list = self.list.get_or_insert_with(|| {
                        let mut list = ListView::new(title);
                        list.set_size(size);
                        list
                    });
                    list.set_items(items);
                    list.set_loading(false);
                    self.state = RunState::List;
                }
                PageBody::Detail { text } => {
                    let size = self.size;
                    let detail = self.detail.get_or_insert_with(|| {
                        let mut detail = DetailView::new(page.title, "");
                        detail.set_size(size);
                        detail
                    });
                    detail.set_content(text);
                    self.state = RunState::Detail;
                }
            },
            Err(err) => self.fail(err),
        }
        true
    }

    pub fn fail(&mut self, err: PageError) {
        let mut failure = DetailView::error(err.to_string());
        failure.set_size(self.size);
        self.failure = Some(failure);
        self.in_flight = false;
        self.state = RunState::Error;
    }

    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
        if let Some(form) = &mut self.form {
            form.set_size(size);
        }
        if let Some(list) = &mut self.list {
            list.set_size(size);
        }
        if let Some(detail) = &mut self.detail {
            detail.set_size(size);
        }
        if let Some(failure) = &mut self.failure {
            failure.set_size(size);
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<PageIntent> {
        let intent = match self.state {
            RunState::Error => self.failure.as_mut()?.handle_key(key),
            RunState::NeedsInput => self.form.as_mut()?.handle_key(key),
            _ => {
                if let Some(list) = &mut self.list {
                    list.handle_key(key)
                } else if let Some(detail) = &mut self.detail {
                    detail.handle_key(key)
                } else if key.code == KeyCode::Esc {
                    Some(ViewIntent::Pop)
                } else {
                    None
                }
            }
        }?;

        match intent {
            ViewIntent::Pop => Some(PageIntent::Pop),
            ViewIntent::Submit(values) => {
                self.params.merge(&values);
                self.form = None;
                self.run()
            }
            ViewIntent::QueryChanged(_) if self.script.mode == Mode::Generator => self.run(),
            ViewIntent::QueryChanged(_) => None,
            ViewIntent::Activate(action) => match action_intent(&action) {
                PageIntent::Reload(overrides) => self.reload(&overrides),
                other => Some(other),
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.state == RunState::Error {
            if let Some(failure) = &self.failure {
                return failure.render(frame, area);
            }
        }
        if self.state == RunState::NeedsInput {
            if let Some(form) = &self.form {
                return form.render(frame, area);
            }
        }
        if let Some(list) = &self.list {
            return list.render(frame, area);
        }
        if let Some(detail) = &self.detail {
            return detail.render(frame, area);
        }
        frame.render_widget(
            Paragraph::new(format!("{} ...", self.script.title))
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }
}
