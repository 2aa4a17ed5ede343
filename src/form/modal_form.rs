use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::debug;

use crate::Theme;
use crate::a11y::{self, FocusScope, FocusTarget, TabDirection};
use crate::config::{DialogAction, KeyResolver, NavAction};
use crate::form::validation::{Application, Experience, Field, FieldErrors, RawApplication, validate};
use crate::modal::{LifecycleProps, ModalAction, ModalRenderer};
use crate::ui::{Component, EventResult, Result, Select, TextInput, TextInputEvent};

const TITLE: &str = " Applicant contact form ";
const CANCEL: &str = "cancel";
const SUBMIT: &str = "submit";

/// Smallest area the form can be drawn into.
const MIN_WIDTH: u16 = 36;
const MIN_HEIGHT: u16 = 9;
const MAX_WIDTH: u16 = 68;
const MAX_HEIGHT: u16 = 22;

/// Body rows before the first field.
const INTRO_ROWS: u16 = 2;
/// Label, input and error line per field.
const FIELD_ROWS: u16 = 3;
/// Dimmed frames drawn while closing before the form asks to be unmounted.
const EXIT_FRAMES: u8 = 2;
#[allow(clippy::cast_possible_truncation)]
const BUTTON_ROW: u16 = INTRO_ROWS + FIELD_ROWS * Field::ALL.len() as u16;

/// What an edit to a field means for the form.
enum Edit {
    Changed,
    Submitted,
}

impl From<TextInputEvent> for Edit {
    fn from(event: TextInputEvent) -> Self {
        match event {
            TextInputEvent::Changed(_) => Self::Changed,
            TextInputEvent::Submitted(_) => Self::Submitted,
        }
    }
}

/// The application form as modal content.
///
/// Submitting runs [`validate`]; only a valid [`Application`] ever leaves the
/// form. Invalid input keeps the modal open, shows messages next to each field,
/// announces the error count on the status line and moves focus to the first
/// invalid field. After the first attempt every edit re-validates.
pub struct ModalForm {
    resolver: Arc<KeyResolver>,
    name: TextInput,
    email: TextInput,
    experience: Select<Experience>,
    github: TextInput,
    focused: Option<FocusTarget>,
    errors: FieldErrors,
    status: Option<String>,
    attempted: bool,
    scroll: u16,
    /// Scroll the focused element into view on the next render.
    reveal: bool,
    dimmed_frames: u8,
}

impl ModalForm {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            name: TextInput::new().with_placeholder("How should we call you?"),
            email: TextInput::new().with_placeholder("you@example.com"),
            experience: Select::new(Experience::ALL.to_vec(), Arc::clone(&resolver))
                .with_placeholder("Choose a bracket"),
            github: TextInput::new().with_placeholder("https://github.com/username"),
            resolver,
            focused: None,
            errors: FieldErrors::default(),
            status: None,
            attempted: false,
            scroll: 0,
            reveal: false,
            dimmed_frames: 0,
        }
    }

    /// Current field text as entered.
    pub fn raw(&self) -> RawApplication {
        RawApplication {
            name: self.name.value().to_string(),
            email: self.email.value().to_string(),
            experience: self
                .experience
                .value()
                .map(ToString::to_string)
                .unwrap_or_default(),
            github: self.github.value().to_string(),
        }
    }

    fn focused_field(&self) -> Option<Field> {
        self.focused
            .as_ref()
            .and_then(FocusTarget::field_name)
            .and_then(Field::from_name)
    }

    fn field_key(&mut self, field: Field, key: KeyEvent) -> Result<EventResult<Edit>> {
        Ok(match field {
            Field::Name => self.name.handle_key(key)?.map(Edit::from),
            Field::Email => self.email.handle_key(key)?.map(Edit::from),
            Field::Experience => self.experience.handle_key(key)?.map(|_| Edit::Changed),
            Field::Github => self.github.handle_key(key)?.map(Edit::from),
        })
    }

    fn attempt_submit(&mut self) -> EventResult<ModalAction<Application>> {
        self.attempted = true;
        match validate(&self.raw()) {
            Ok(application) => {
                self.errors = FieldErrors::default();
                self.status = None;
                ModalAction::Submit(application).into()
            }
            Err(errors) => {
                debug!(errors = errors.len(), "Form rejected");
                self.status = Some(errors.to_string());
                if let Some((field, _)) = errors.first() {
                    self.focus(&FocusTarget::field(field.name()));
                }
                self.errors = errors;
                EventResult::Consumed
            }
        }
    }

    fn revalidate(&mut self) {
        if !self.attempted {
            return;
        }
        self.errors = validate(&self.raw()).err().unwrap_or_default();
        self.status = if self.errors.is_empty() {
            Some("All fields look good.".to_string())
        } else {
            Some(self.errors.to_string())
        };
    }

    fn step_focus(&mut self, direction: TabDirection) {
        let focusables = self.focusables();
        if let Some(next) = a11y::cycle(&focusables, self.focused.as_ref(), direction) {
            let next = next.clone();
            self.focus(&next);
        }
    }

    fn scroll_by(&mut self, rows: i32) {
        let target = i32::from(self.scroll).saturating_add(rows).clamp(0, i32::from(BUTTON_ROW));
        self.scroll = u16::try_from(target).unwrap_or(BUTTON_ROW);
        self.reveal = false;
    }

    /// Body rows occupied by `target`, inclusive.
    fn rows_of(target: &FocusTarget) -> (u16, u16) {
        match target {
            FocusTarget::Title => (0, 0),
            FocusTarget::Button(_) => (BUTTON_ROW, BUTTON_ROW),
            FocusTarget::Field(name) => {
                let index = Field::ALL
                    .iter()
                    .position(|f| f.name() == name)
                    .and_then(|i| u16::try_from(i).ok())
                    .unwrap_or(0);
                let start = INTRO_ROWS + FIELD_ROWS * index;
                (start, start + FIELD_ROWS - 1)
            }
        }
    }

    fn clamp_scroll(&mut self, viewport: u16) {
        let max = (BUTTON_ROW + 1).saturating_sub(viewport);
        if self.reveal {
            self.reveal = false;
            if let Some(target) = &self.focused {
                let (start, end) = Self::rows_of(target);
                if start < self.scroll {
                    self.scroll = start;
                } else if end >= self.scroll + viewport {
                    self.scroll = (end + 1).saturating_sub(viewport);
                }
            }
        }
        self.scroll = self.scroll.min(max);
    }

    fn is_focused(&self, target: &FocusTarget) -> bool {
        self.focused.as_ref() == Some(target)
    }

    fn body(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Leave your contact details and we will get back to you.",
                Style::default().fg(theme.subtext0()),
            )),
            Line::from(""),
        ];

        for field in Field::ALL {
            let focused = self.is_focused(&FocusTarget::field(field.name()));
            let label_style = if focused {
                Style::default()
                    .fg(theme.primary())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text())
            };
            let mut label = vec![Span::styled(field.label(), label_style)];
            if field.is_required() {
                label.push(Span::styled(" *", Style::default().fg(theme.peach())));
            }
            lines.push(Line::from(label));

            let mut input = vec![Span::styled(
                if focused { "› " } else { "  " },
                Style::default().fg(theme.primary()),
            )];
            input.extend(self.field_line(field, focused, theme).spans);
            lines.push(Line::from(input));

            lines.push(self.errors.get(field).map_or_else(
                || Line::from(""),
                |message| {
                    Line::from(Span::styled(
                        format!("  ! {message}"),
                        Style::default().fg(theme.error()),
                    ))
                },
            ));
        }

        lines.push(Line::from(vec![
            Span::raw("  "),
            self.button("Cancel", CANCEL, theme),
            Span::raw("  "),
            self.button("Submit", SUBMIT, theme),
        ]));
        lines
    }

    fn field_line(&self, field: Field, focused: bool, theme: &Theme) -> Line<'static> {
        match field {
            Field::Name => self.name.line(focused, theme),
            Field::Email => self.email.line(focused, theme),
            Field::Experience => self.experience.line(focused, theme),
            Field::Github => self.github.line(focused, theme),
        }
    }

    fn button(&self, label: &str, name: &str, theme: &Theme) -> Span<'static> {
        let style = if self.is_focused(&FocusTarget::button(name)) {
            Style::default()
                .fg(theme.base())
                .bg(theme.primary())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text()).bg(theme.surface0())
        };
        Span::styled(format!(" {label} "), style)
    }

    fn hint(&self) -> String {
        format!(
            "{} next · {} prev · {} submit · {} close",
            self.resolver.display_dialog(DialogAction::FocusNext),
            self.resolver.display_dialog(DialogAction::FocusPrev),
            self.resolver.display_nav(NavAction::Select),
            self.resolver.display_dialog(DialogAction::Close),
        )
    }
}

impl FocusScope for ModalForm {
    fn focusables(&self) -> Vec<FocusTarget> {
        Field::ALL
            .iter()
            .map(|f| FocusTarget::field(f.name()))
            .chain([FocusTarget::button(CANCEL), FocusTarget::button(SUBMIT)])
            .collect()
    }

    fn focused(&self) -> Option<FocusTarget> {
        self.focused.clone()
    }

    fn focus(&mut self, target: &FocusTarget) {
        if *target == FocusTarget::Title || self.focusables().contains(target) {
            self.focused = Some(target.clone());
            self.reveal = true;
        }
    }

    fn title(&self) -> Option<FocusTarget> {
        Some(FocusTarget::Title)
    }

    fn scroll_offset(&self) -> u16 {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: u16) {
        self.scroll = offset.min(BUTTON_ROW);
    }
}

impl ModalRenderer<Application> for ModalForm {
    fn render(
        &mut self,
        props: LifecycleProps,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
    ) -> Result<()> {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            // Not a fault: the form comes back once the terminal grows
            let notice =
                format!("Terminal too small for the form (needs {MIN_WIDTH}x{MIN_HEIGHT})");
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(Span::styled(notice, Style::default().fg(theme.peach())))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
            return Ok(());
        }

        let popup = area.centered(
            Constraint::Length(MAX_WIDTH.min(area.width)),
            Constraint::Length(MAX_HEIGHT.min(area.height)),
        );
        frame.render_widget(Clear, popup);

        let title_style = if self.is_focused(&FocusTarget::Title) {
            Style::default()
                .fg(theme.base())
                .bg(theme.border_focused())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(theme.primary())
                .add_modifier(Modifier::BOLD)
        };
        let block = Block::default()
            .title(TITLE)
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.mantle()));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [body, status, hint] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner.inner(Margin::new(1, 0)));

        self.clamp_scroll(body.height);
        frame.render_widget(
            Paragraph::new(self.body(theme)).scroll((self.scroll, 0)),
            body,
        );

        if let Some(message) = &self.status {
            let color = if self.errors.is_empty() {
                theme.success()
            } else {
                theme.error()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message.clone(), Style::default().fg(color))),
                status,
            );
        }
        frame.render_widget(
            Paragraph::new(Span::styled(self.hint(), Style::default().fg(theme.overlay1()))),
            hint,
        );

        if !props.is_open {
            frame
                .buffer_mut()
                .set_style(popup, Style::default().add_modifier(Modifier::DIM));
            self.dimmed_frames = self.dimmed_frames.saturating_add(1);
        }
        Ok(())
    }

    fn on_tick(&mut self, props: LifecycleProps) -> Option<ModalAction<Application>> {
        (!props.is_open && self.dimmed_frames >= EXIT_FRAMES).then_some(ModalAction::Unmount)
    }

    fn handle_key(
        &mut self,
        props: LifecycleProps,
        key: KeyEvent,
    ) -> Result<EventResult<ModalAction<Application>>> {
        if !props.is_open {
            return Ok(EventResult::Ignored);
        }

        if let Some(field) = self.focused_field() {
            match self.field_key(field, key)? {
                EventResult::Event(Edit::Submitted) => return Ok(self.attempt_submit()),
                EventResult::Event(Edit::Changed) => {
                    self.revalidate();
                    return Ok(EventResult::Consumed);
                }
                EventResult::Consumed => return Ok(EventResult::Consumed),
                EventResult::Ignored => {}
            }
        }

        if self.resolver.matches_nav(&key, NavAction::Select) {
            if self.is_focused(&FocusTarget::button(CANCEL)) {
                return Ok(ModalAction::Close.into());
            }
            return Ok(self.attempt_submit());
        }
        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.step_focus(TabDirection::Forward);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.step_focus(TabDirection::Backward);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::PageDown) {
            self.scroll_by(i32::from(FIELD_ROWS) * 2);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::PageUp) {
            self.scroll_by(-i32::from(FIELD_ROWS) * 2);
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::a11y::test_resolver;
    use crate::modal::ModalId;

    fn props(is_open: bool) -> LifecycleProps {
        LifecycleProps {
            id: ModalId::new(1),
            is_open,
        }
    }

    fn press(form: &mut ModalForm, code: KeyCode) -> EventResult<ModalAction<Application>> {
        ModalRenderer::handle_key(form, props(true), KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn fill(form: &mut ModalForm, field: &str, text: &str) {
        form.focus(&FocusTarget::field(field));
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    fn draw(form: &mut ModalForm, width: u16, height: u16, is_open: bool) -> Result<Terminal<TestBackend>> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut outcome = Ok(());
        terminal
            .draw(|frame| {
                let area = frame.area();
                outcome = ModalRenderer::render(form, props(is_open), frame, area, &Theme::default());
            })
            .unwrap();
        outcome.map(|()| terminal)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_focus_order() {
        let form = ModalForm::new(test_resolver());
        let names: Vec<String> = form.focusables().iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "field:name",
                "field:email",
                "field:experience",
                "field:github",
                "button:cancel",
                "button:submit"
            ]
        );
        assert_eq!(form.title(), Some(FocusTarget::Title));
    }

    #[test]
    fn test_empty_submit_reports_and_focuses_first_error() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::button(SUBMIT));

        assert_eq!(press(&mut form, KeyCode::Enter), EventResult::Consumed);
        assert_eq!(form.errors.len(), 3);
        assert_eq!(form.focused(), Some(FocusTarget::field("name")));
        assert!(form.status.as_deref().unwrap().starts_with("The form has 3 errors"));
    }

    #[test]
    fn test_valid_submit_emits_application() {
        let mut form = ModalForm::new(test_resolver());
        fill(&mut form, "name", " Ada ");
        fill(&mut form, "email", "ada@example.com");
        form.focus(&FocusTarget::field("experience"));
        press(&mut form, KeyCode::Right);

        let EventResult::Event(ModalAction::Submit(application)) = press(&mut form, KeyCode::Enter)
        else {
            panic!("expected submit");
        };
        assert_eq!(application.name, "Ada");
        assert_eq!(application.email, "ada@example.com");
        assert_eq!(application.experience, Experience::UpToThree);
        assert_eq!(application.github, None);
    }

    #[test]
    fn test_enter_in_text_field_submits() {
        let mut form = ModalForm::new(test_resolver());
        fill(&mut form, "email", "not-an-email");
        assert_eq!(press(&mut form, KeyCode::Enter), EventResult::Consumed);
        assert_eq!(
            form.errors.get(Field::Email),
            Some("Please enter a valid email address.")
        );
    }

    #[test]
    fn test_edits_revalidate_after_first_attempt() {
        let mut form = ModalForm::new(test_resolver());
        fill(&mut form, "name", "x");
        press(&mut form, KeyCode::Backspace);
        assert!(form.errors.is_empty());
        assert_eq!(form.status.as_deref(), None);

        press(&mut form, KeyCode::Enter);
        assert!(form.errors.get(Field::Name).is_some());

        press(&mut form, KeyCode::Char('A'));
        assert!(form.errors.get(Field::Name).is_none());
        assert_eq!(form.errors.len(), 2);
    }

    #[test]
    fn test_cancel_button_closes() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::button(CANCEL));
        assert_eq!(
            press(&mut form, KeyCode::Enter),
            EventResult::Event(ModalAction::Close)
        );
    }

    #[test]
    fn test_arrows_move_between_fields() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::Title);
        press(&mut form, KeyCode::Down);
        assert_eq!(form.focused(), Some(FocusTarget::field("name")));
        press(&mut form, KeyCode::Up);
        assert_eq!(form.focused(), Some(FocusTarget::button(SUBMIT)));

        // The select keeps arrows for cycling its options
        form.focus(&FocusTarget::field("experience"));
        press(&mut form, KeyCode::Down);
        assert_eq!(form.focused(), Some(FocusTarget::field("experience")));
        assert_eq!(form.raw().experience, "0~3년");
    }

    #[test]
    fn test_unknown_focus_targets_are_ignored() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::field("phone"));
        assert_eq!(form.focused(), None);
    }

    #[test]
    fn test_render_shows_fields_and_errors() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::button(SUBMIT));
        press(&mut form, KeyCode::Enter);

        let terminal = draw(&mut form, 80, 24, true).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Applicant contact form"));
        assert!(text.contains("Name / nickname"));
        assert!(text.contains("Please enter your name or nickname."));
        assert!(text.contains("The form has 3 errors"));
    }

    #[test]
    fn test_focused_field_scrolls_into_view() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::button(SUBMIT));
        draw(&mut form, 60, 12, true).unwrap();
        assert!(form.scroll_offset() > 0);

        form.focus(&FocusTarget::Title);
        draw(&mut form, 60, 12, true).unwrap();
        assert_eq!(form.scroll_offset(), 0);
    }

    #[test]
    fn test_page_keys_scroll() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::button(SUBMIT));
        press(&mut form, KeyCode::PageDown);
        assert_eq!(form.scroll_offset(), 6);
        press(&mut form, KeyCode::PageUp);
        press(&mut form, KeyCode::PageUp);
        assert_eq!(form.scroll_offset(), 0);
    }

    #[test]
    fn test_closing_form_is_dimmed_and_inert() {
        let mut form = ModalForm::new(test_resolver());
        let terminal = draw(&mut form, 80, 24, false).unwrap();
        let cell = &terminal.backend().buffer()[(40, 12)];
        assert!(cell.modifier.contains(Modifier::DIM));

        let result = ModalRenderer::handle_key(
            &mut form,
            props(false),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        )
        .unwrap();
        assert_eq!(result, EventResult::Ignored);
    }

    #[test]
    fn test_unmounts_after_exit_frames() {
        let mut form = ModalForm::new(test_resolver());
        assert_eq!(form.on_tick(props(true)), None);

        draw(&mut form, 80, 24, false).unwrap();
        assert_eq!(form.on_tick(props(false)), None);
        draw(&mut form, 80, 24, false).unwrap();
        assert_eq!(form.on_tick(props(false)), Some(ModalAction::Unmount));
    }

    #[test]
    fn test_too_small_area_shows_notice() {
        let mut form = ModalForm::new(test_resolver());
        form.focus(&FocusTarget::field("email"));
        let terminal = draw(&mut form, 30, 8, true).unwrap();
        assert!(screen(&terminal).contains("Terminal too small"));

        let terminal = draw(&mut form, 80, 24, true).unwrap();
        assert!(screen(&terminal).contains("Applicant contact form"));
        assert_eq!(form.focused(), Some(FocusTarget::field("email")));
    }
}
