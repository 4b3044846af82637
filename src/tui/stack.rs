use super::container::RunContainer;
use super::detail::DetailView;
use super::intent::{
    action_intent, Command, ContainerId, Effect, EffectKind, ExitReason, Msg, PageIntent,
    ViewIntent,
};
use super::keys::is_interrupt;
use super::list::ListView;
use super::render::page_frame;
use super::viewport::{page_size, PageSize, ViewportOptions};
use crate::extension::{ExtensionError, ExtensionRegistry, ParameterBinding};
use crate::runner::Invocation;
use crossterm::event::KeyEvent;
use ratatui::Frame;

/// One entry of the navigation stack.
#[derive(Debug, Clone)]
pub enum Page {
    List(ListView),
    Detail(DetailView),
    Run(RunContainer),
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::List(list) => list.title(),
            Page::Detail(detail) => detail.title(),
            Page::Run(container) => container.title(),
        }
    }

    pub fn size(&self) -> PageSize {
        match self {
            Page::List(list) => list.size(),
            Page::Detail(detail) => detail.size(),
            Page::Run(container) => container.size(),
        }
    }

    pub fn set_size(&mut self, size: PageSize) {
        match self {
            Page::List(list) => list.set_size(size),
            Page::Detail(detail) => detail.set_size(size),
            Page::Run(container) => container.set_size(size),
        }
    }

    pub fn container(&self) -> Option<&RunContainer> {
        match self {
            Page::Run(container) => Some(container),
            _ => None,
        }
    }

    /// Body of the detail page on screen, including error pages.
    pub fn detail_text(&self) -> Option<&str> {
        match self {
            Page::Detail(detail) => Some(detail.text()),
            Page::Run(container) => container.displayed_text(),
            Page::List(_) => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<PageIntent> {
        match self {
            Page::Run(container) => container.handle_key(key),
            Page::List(list) => match list.handle_key(key)? {
                ViewIntent::Activate(action) => Some(action_intent(&action)),
                ViewIntent::Pop => Some(PageIntent::Pop),
                ViewIntent::QueryChanged(_) | ViewIntent::Submit(_) => None,
            },
            Page::Detail(detail) => match detail.handle_key(key)? {
                ViewIntent::Pop => Some(PageIntent::Pop),
                _ => None,
            },
        }
    }

    fn render(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        match self {
            Page::List(list) => list.render(frame, area),
            Page::Detail(detail) => detail.render(frame, area),
            Page::Run(container) => container.render(frame, area),
        }
    }
}

/// Ordered navigation history. Never empty: popping the last page yields
/// a quit command instead.
#[derive(Debug)]
pub struct PageStack<'a> {
    registry: &'a ExtensionRegistry,
    options: ViewportOptions,
    terminal: PageSize,
    size: PageSize,
    pages: Vec<Page>,
    next_id: ContainerId,
    effect_pending: bool,
}

impl<'a> PageStack<'a> {
    /// Stack whose bottom page is `root`, sized for a terminal of
    /// `terminal` cells.
    pub fn new(
        registry: &'a ExtensionRegistry,
        options: ViewportOptions,
        terminal: PageSize,
        mut root: Page,
    ) -> Self {
        let size = page_size(terminal.width, terminal.height, &options);
        root.set_size(size);
        Self {
            registry,
            options,
            terminal,
            size,
            pages: vec![root],
            next_id: 1,
            effect_pending: false,
        }
    }

    /// Root page listing every extension's root items.
    pub fn root(
        registry: &'a ExtensionRegistry,
        options: ViewportOptions,
        terminal: PageSize,
    ) -> Self {
        let list = ListView::new("Sunbeam").with_items(registry.root_list_items());
        Self::new(registry, options, terminal, Page::List(list))
    }

    /// Stack whose bottom page runs `script`, plus the commands its first
    /// step needs.
    pub fn for_script(
        registry: &'a ExtensionRegistry,
        options: ViewportOptions,
        terminal: PageSize,
        extension: &str,
        script: &str,
        params: ParameterBinding,
    ) -> Result<(Self, Vec<Command>), ExtensionError> {
        let (extension, script_def) = registry.resolve(extension, script)?;
        let container = RunContainer::new(1, extension, script, script_def, params);
        let mut stack = Self::new(registry, options, terminal, Page::Run(container));
        stack.next_id = 2;
        let intent = match stack.pages.last_mut() {
            Some(Page::Run(container)) => container.init(),
            _ => None,
        };
        let commands = intent
            .map(|intent| stack.apply(intent))
            .unwrap_or_default();
        Ok((stack, commands))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn top(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn terminal(&self) -> PageSize {
        self.terminal
    }

    /// True while a copy or open effect is running; input is ignored until
    /// it reports back.
    pub fn effect_pending(&self) -> bool {
        self.effect_pending
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        self.registry
    }

    pub fn container(&self, id: ContainerId) -> Option<&RunContainer> {
        self.pages
            .iter()
            .filter_map(Page::container)
            .find(|container| container.id() == id)
    }

    fn container_mut(&mut self, id: ContainerId) -> Option<&mut RunContainer> {
        self.pages.iter_mut().find_map(|page| match page {
            Page::Run(container) if container.id() == id => Some(container),
            _ => None,
        })
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Key(key) => {
                if is_interrupt(&key) {
                    return vec![Command::Quit(ExitReason::Interrupted)];
                }
                if self.effect_pending {
                    return Vec::new();
                }
                let intent = self.pages.last_mut().and_then(|page| page.handle_key(&key));
                intent.map(|intent| self.apply(intent)).unwrap_or_default()
            }
            Msg::Resize { width, height } => {
                self.resize(width, height);
                Vec::new()
            }
            Msg::RunFinished {
                container,
                generation,
                result,
            } => {
                if let Some(container) = self.container_mut(container) {
                    container.apply_result(generation, result);
                }
                Vec::new()
            }
            Msg::InteractiveFinished { container, result } => match result {
                Ok(()) => {
                    let on_top = matches!(
                        self.pages.last(),
                        Some(Page::Run(top)) if top.id() == container
                    );
                    if on_top {
                        self.pop()
                    } else {
                        Vec::new()
                    }
                }
                Err(err) => {
                    if let Some(container) = self.container_mut(container) {
                        container.fail(err);
                    }
                    Vec::new()
                }
            },
            Msg::EffectFinished { effect, result } => {
                self.effect_pending = false;
                match result {
                    Ok(()) => {
                        let reason = match effect {
                            EffectKind::Copy => ExitReason::Copied,
                            EffectKind::Open => ExitReason::Opened,
                        };
                        vec![Command::Quit(reason)]
                    }
                    Err(message) => {
                        self.replace_top_with_error(message);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn apply(&mut self, intent: PageIntent) -> Vec<Command> {
        match intent {
            PageIntent::Push {
                extension,
                script,
                params,
            } => match self.push_script(&extension, &script, params) {
                Ok(commands) => commands,
                Err(err) => {
                    self.replace_top_with_error(err.to_string());
                    Vec::new()
                }
            },
            PageIntent::Pop => self.pop(),
            PageIntent::Reload(_) => Vec::new(),
            PageIntent::Invoke(request) => vec![Command::Invoke(request)],
            PageIntent::Interactive(request) => vec![Command::RunInteractive(request)],
            PageIntent::Effect(Effect::Copy { .. } | Effect::Open { .. }) if self.effect_pending => {
                Vec::new()
            }
            PageIntent::Effect(Effect::Copy { content }) => {
                self.effect_pending = true;
                vec![Command::Copy(content)]
            }
            PageIntent::Effect(Effect::Open { url, application }) => {
                self.effect_pending = true;
                vec![Command::Open { url, application }]
            }
            PageIntent::Effect(Effect::Exec {
                command,
                extension,
                silent,
            }) => {
                let cwd = self.registry.get(&extension).map(|ext| ext.dir.clone());
                vec![Command::Quit(ExitReason::Exec {
                    invocation: Invocation::shell(&command, cwd),
                    silent,
                })]
            }
            PageIntent::Effect(Effect::Exit) => vec![Command::Quit(ExitReason::Exit)],
        }
    }

    /// Pushes a Run Container for `script`, sized to the current viewport,
    /// and starts it.
    pub fn push_script(
        &mut self,
        extension: &str,
        script: &str,
        params: ParameterBinding,
    ) -> Result<Vec<Command>, ExtensionError> {
        let registry = self.registry;
        let (extension, script_def) = registry.resolve(extension, script)?;
        let mut container = RunContainer::new(self.next_id, extension, script, script_def, params);
        self.next_id += 1;
        container.set_size(self.size);
        let intent = container.init();
        self.pages.push(Page::Run(container));
        Ok(intent.map(|intent| self.apply(intent)).unwrap_or_default())
    }

    pub fn pop(&mut self) -> Vec<Command> {
        if self.pages.len() <= 1 {
            return vec![Command::Quit(ExitReason::Popped)];
        }
        self.pages.pop();
        Vec::new()
    }

    /// Discards the top page in favour of an error page.
    pub fn replace_top_with_error(&mut self, message: impl Into<String>) {
        let mut detail = DetailView::error(message);
        detail.set_size(self.size);
        match self.pages.last_mut() {
            Some(top) => *top = Page::Detail(detail),
            None => self.pages.push(Page::Detail(detail)),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal = PageSize::new(width, height);
        self.size = page_size(width, height, &self.options);
        for page in &mut self.pages {
            page.set_size(self.size);
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let inner = page_frame(frame, self.size);
        if let Some(top) = self.pages.last() {
            top.render(frame, inner);
        }
    }
}
