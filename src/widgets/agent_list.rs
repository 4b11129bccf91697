//! AgentList: a selectable list of agents with compact and detailed modes.
//!
//! Agents come from the `agents` prop, an array of `{id, name?, status?,
//! task?}` objects. Entries without an `id` (or with an unknown status) are
//! skipped at render time and reported through a render degradation.

use std::time::Duration;

use serde_json::json;

use crate::error::WidgetError;
use crate::event::{Key, MouseKind};
use crate::props::{PropValue, Props};
use crate::schema::{ComponentSchema, FieldDescriptor, FieldKind};
use crate::style::{Axes, Axis, Padding, PartTable, StyleRecord};
use crate::widget::{
    Component, KeyBinding, MouseBinding, MouseHit, Mutation, PartSpec, RenderDegradation, View,
    Widget, NO_DATA,
};

use super::status::Status;
use super::{common_axes, common_fields, container_table, header_table};

const DISPLAY_MODES: &[&str] = &["compact", "detailed"];

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub status: Option<Status>,
    pub task: Option<String>,
}

impl Agent {
    fn from_prop(value: &PropValue) -> Option<Self> {
        let object = value.as_object()?;
        let id = object.get("id")?.as_str()?.to_owned();
        let name = match object.get("name") {
            Some(name) => name.as_str()?.to_owned(),
            None => id.clone(),
        };
        let status = match object.get("status") {
            Some(status) => Some(status.as_str()?.parse().ok()?),
            None => None,
        };
        let task = object.get("task").and_then(PropValue::as_str).map(str::to_owned);
        Some(Self {
            id,
            name,
            status,
            task,
        })
    }
}

/// Well-formed agents in prop order, plus the number of skipped entries.
fn parse_agents(props: &Props) -> (Vec<Agent>, usize) {
    let raw = props.get("agents").and_then(PropValue::as_array).unwrap_or(&[]);
    let agents: Vec<Agent> = raw.iter().filter_map(Agent::from_prop).collect();
    let malformed = raw.len() - agents.len();
    (agents, malformed)
}

fn detailed(props: &Props) -> bool {
    props.get_str("displayMode") == Some("detailed")
}

fn lines_per_agent(props: &Props) -> usize {
    if detailed(props) {
        2
    } else {
        1
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentListState {
    /// Highlighted row.
    pub cursor: usize,
    /// Id of the last selected agent.
    pub selected: Option<String>,
}

// ---------------------------------------------------------------------------
// AgentList
// ---------------------------------------------------------------------------

/// A list of agents with keyboard and mouse selection.
pub struct AgentList;

impl AgentList {
    fn interactive(m: &mut Mutation<'_, Self>) -> bool {
        let props = m.props();
        if props.flag("disabled", false) || !props.flag("selectable", true) {
            m.skip_render();
            return false;
        }
        true
    }

    fn select_index(m: &mut Mutation<'_, Self>, index: usize) -> bool {
        let (agents, _) = parse_agents(m.props());
        let Some(agent) = agents.get(index) else {
            m.skip_render();
            return false;
        };
        let payload = json!({ "id": agent.id, "name": agent.name, "index": index });
        let state = m.state_mut();
        state.cursor = index;
        state.selected = Some(agent.id.clone());
        m.emit("agent_selected", payload);
        true
    }

    fn move_cursor(m: &mut Mutation<'_, Self>, down: bool) {
        if !Self::interactive(m) {
            return;
        }
        let (agents, _) = parse_agents(m.props());
        if agents.is_empty() {
            m.skip_render();
            return;
        }
        let last = agents.len() - 1;
        let state = m.state_mut();
        state.cursor = if down {
            (state.cursor + 1).min(last)
        } else {
            state.cursor.saturating_sub(1)
        };
    }

    fn up(m: &mut Mutation<'_, Self>) {
        Self::move_cursor(m, false);
    }

    fn down(m: &mut Mutation<'_, Self>) {
        Self::move_cursor(m, true);
    }

    fn confirm(m: &mut Mutation<'_, Self>) {
        if Self::interactive(m) {
            let cursor = m.state().cursor;
            Self::select_index(m, cursor);
        }
    }

    fn click(m: &mut Mutation<'_, Self>, hit: MouseHit) {
        if !Self::interactive(m) {
            return;
        }
        match hit.line {
            Some(line) => {
                let index = line / lines_per_agent(m.props());
                Self::select_index(m, index);
            }
            None => m.skip_render(),
        }
    }

    fn agent_lines(agent: &Agent, cursor: bool, selected: bool, detailed: bool) -> Vec<String> {
        let marker = if cursor { "▸" } else { " " };
        let status = agent.status.map_or("unknown", Status::name);
        let check = if selected { " ✓" } else { "" };
        let mut lines = vec![format!("{marker} {} [{status}]{check}", agent.name)];
        if detailed {
            lines.push(format!("    {}", agent.task.as_deref().unwrap_or("no task")));
        }
        lines
    }
}

impl Component for AgentList {
    const NAME: &'static str = "AgentList";
    type State = AgentListState;

    fn schema() -> ComponentSchema {
        common_fields(ComponentSchema::new(Self::NAME))
            .field(FieldDescriptor::optional("agents", FieldKind::array_of(FieldKind::Object)).default_value(
                PropValue::Array(Vec::new()),
            ))
            .field(FieldDescriptor::optional("title", FieldKind::String).default_value("Agents"))
            .field(
                FieldDescriptor::optional("displayMode", FieldKind::one_of(DISPLAY_MODES))
                    .default_value("compact"),
            )
            .field(FieldDescriptor::optional("selectable", FieldKind::Boolean).default_value(true))
    }

    fn parts() -> Vec<PartSpec> {
        vec![
            PartSpec::new(container_table(Self::NAME)),
            PartSpec::new(header_table(Self::NAME)).shown_by("showHeader"),
            PartSpec::new(
                PartTable::new(Self::NAME, "list")
                    .base(|theme| StyleRecord::new().fg(theme.color("text.primary", "white")))
                    .layer(Axis::Layout, "compact", |_| StyleRecord::new())
                    .layer(Axis::Layout, "detailed", |_| {
                        StyleRecord::new().padding(Padding::new(0, 0, 0, 1))
                    })
                    .layer(Axis::Override, "disabled", |theme| {
                        StyleRecord::new().dim(true).fg(theme.color("text.muted", "grey"))
                    }),
            ),
        ]
    }

    fn init_state(props: &Props, _now: Duration) -> AgentListState {
        let (agents, malformed) = parse_agents(props);
        if malformed > 0 {
            tracing::warn!(malformed, valid = agents.len(), "agent entries will be skipped");
        }
        AgentListState::default()
    }

    fn axes(part: &str, view: &View<'_, Self>) -> Axes {
        let axes = common_axes(view.props);
        match part {
            "list" => axes.with(Axis::Layout, view.props.get_str("displayMode")),
            _ => axes,
        }
    }

    fn render(part: &str, view: &View<'_, Self>) -> Result<String, RenderDegradation> {
        match part {
            "container" => Ok(String::new()),
            "header" => {
                let title = view.props.get_str("title").unwrap_or("Agents");
                Ok(format!("{title} ({})", parse_agents(view.props).0.len()))
            }
            "list" => {
                let (agents, malformed) = parse_agents(view.props);
                if agents.is_empty() {
                    return if malformed == 0 {
                        Ok(NO_DATA.to_owned())
                    } else {
                        Err(RenderDegradation::new(format!("all {malformed} agent entries are malformed")))
                    };
                }
                let detailed = detailed(view.props);
                let selected = view.state.selected.as_deref();
                let body = agents
                    .iter()
                    .enumerate()
                    .flat_map(|(index, agent)| {
                        Self::agent_lines(
                            agent,
                            index == view.state.cursor,
                            selected == Some(agent.id.as_str()),
                            detailed,
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                if malformed > 0 {
                    return Err(RenderDegradation::with_fallback(
                        format!("{malformed} malformed agent entries skipped"),
                        format!("{body}\n({malformed} malformed skipped)"),
                    ));
                }
                Ok(body)
            }
            other => Err(RenderDegradation::new(format!("unknown part `{other}`"))),
        }
    }

    fn key_bindings() -> Vec<KeyBinding<Self>> {
        vec![
            KeyBinding::focused(&[Key::Up, Key::Char('k')], Self::up),
            KeyBinding::focused(&[Key::Down, Key::Char('j')], Self::down),
            KeyBinding::focused(&[Key::Enter], Self::confirm),
        ]
    }

    fn mouse_bindings() -> Vec<MouseBinding<Self>> {
        vec![MouseBinding::new("list", MouseKind::Click, Self::click)]
    }

    fn on_props_changed(m: &mut Mutation<'_, Self>) {
        let (agents, _) = parse_agents(m.props());
        let state = m.state_mut();
        state.cursor = state.cursor.min(agents.len().saturating_sub(1));
        if let Some(id) = &state.selected {
            if !agents.iter().any(|a| &a.id == id) {
                state.selected = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Widget<AgentList> {
    /// Select the agent with `id` and emit `agent_selected`.
    pub fn select_agent(&self, id: &str) -> Result<(), WidgetError> {
        let index = parse_agents(&self.props()?)
            .0
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| WidgetError::InvalidArgument {
                operation: "select_agent",
                message: format!("no agent with id `{id}`"),
            })?;
        self.mutate(|m| {
            AgentList::select_index(m, index);
        })
    }

    /// Well-formed agents currently listed.
    pub fn agents(&self) -> Result<Vec<Agent>, WidgetError> {
        Ok(parse_agents(&self.props()?).0)
    }

    pub fn selected(&self) -> Result<Option<Agent>, WidgetError> {
        let Some(id) = self.with_state(|s| s.selected.clone())? else {
            return Ok(None);
        };
        Ok(self.agents()?.into_iter().find(|a| a.id == id))
    }

    pub fn cursor(&self) -> Result<usize, WidgetError> {
        self.with_state(|s| s.cursor)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyEvent, MouseEvent};
    use crate::widget::Env;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn agents() -> Props {
        Props::from_json(json!({
            "agents": [
                { "id": "a", "name": "alpha", "status": "running", "task": "index repo" },
                { "id": "b", "name": "beta", "status": "idle" },
                { "id": "c", "status": "error" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn compact_rows() {
        let (env, surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents(), &env).unwrap();
        let list = w.element("list").unwrap();
        assert_eq!(
            surface.borrow().content(list),
            Some("▸ alpha [running]\n  beta [idle]\n  c [error]")
        );
        let header = w.element("header").unwrap();
        assert_eq!(surface.borrow().content(header), Some("Agents (3)"));
    }

    #[test]
    fn detailed_rows_and_layout_axis() {
        let (env, surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents().with("displayMode", "detailed"), &env).unwrap();
        let list = w.element("list").unwrap();
        let surface = surface.borrow();
        let content = surface.content(list).unwrap();
        assert!(content.starts_with("▸ alpha [running]\n    index repo\n  beta [idle]\n    no task"));
        assert_eq!(
            surface.style(list).and_then(|s| s.padding),
            Some(Padding::new(0, 0, 0, 1))
        );
    }

    #[test]
    fn keyboard_selection_emits() {
        let (env, _surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents(), &env).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        w.on("agent_selected", move |e| sink.borrow_mut().push(e.data["id"].clone()))
            .unwrap();

        w.focus().unwrap();
        env.surface.dispatch_key(&KeyEvent::plain(Key::Down));
        env.surface.dispatch_key(&KeyEvent::plain(Key::Down));
        env.surface.dispatch_key(&KeyEvent::plain(Key::Down));
        assert_eq!(w.cursor().unwrap(), 2);
        env.surface.dispatch_key(&KeyEvent::plain(Key::Up));
        env.surface.dispatch_key(&KeyEvent::plain(Key::Enter));

        assert_eq!(*seen.borrow(), vec![json!("b")]);
        assert_eq!(w.selected().unwrap().map(|a| a.name), Some("beta".to_owned()));
    }

    #[test]
    fn click_selects_row() {
        let (env, surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents(), &env).unwrap();
        // Border row, then the header, then one row per agent.
        let handled = env
            .surface
            .dispatch_mouse(&MouseEvent::new(MouseKind::Click, 5, 3));
        assert_eq!(handled, 1);
        assert_eq!(w.selected().unwrap().map(|a| a.id), Some("b".to_owned()));
        let list = w.element("list").unwrap();
        assert_eq!(
            surface.borrow().content(list),
            Some("  alpha [running]\n▸ beta [idle] ✓\n  c [error]")
        );
    }

    #[test]
    fn select_agent_by_id() {
        let (env, _surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents(), &env).unwrap();
        w.select_agent("c").unwrap();
        assert_eq!(w.cursor().unwrap(), 2);
        assert!(matches!(
            w.select_agent("zzz"),
            Err(WidgetError::InvalidArgument { operation: "select_agent", .. })
        ));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let (env, surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(Props::new(), &env).unwrap();
        let list = w.element("list").unwrap();
        assert_eq!(surface.borrow().content(list), Some(NO_DATA));
    }

    #[test]
    fn malformed_entries_degrade() {
        let (env, surface) = Env::headless(40, 12);
        let props = Props::from_json(json!({
            "agents": [
                { "id": "a", "name": "alpha" },
                { "name": "no id" },
                { "id": "x", "status": "sleeping" }
            ]
        }))
        .unwrap();
        let w = Widget::<AgentList>::new(props, &env).unwrap();
        let list = w.element("list").unwrap();
        assert_eq!(
            surface.borrow().content(list),
            Some("▸ alpha [unknown]\n(2 malformed skipped)")
        );

        w.update(Props::from_json(json!({ "agents": [{ "name": "still no id" }] })).unwrap())
            .unwrap();
        assert_eq!(surface.borrow().content(list), Some(NO_DATA));
    }

    #[test]
    fn shrinking_agents_clamps_cursor() {
        let (env, _surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents(), &env).unwrap();
        w.select_agent("c").unwrap();
        w.update(Props::from_json(json!({ "agents": [{ "id": "a" }] })).unwrap())
            .unwrap();
        assert_eq!(w.cursor().unwrap(), 0);
        assert!(w.selected().unwrap().is_none());
    }

    #[test]
    fn unselectable_ignores_input() {
        let (env, _surface) = Env::headless(40, 12);
        let w = Widget::<AgentList>::new(agents().with("selectable", false), &env).unwrap();
        env.surface
            .dispatch_mouse(&MouseEvent::new(MouseKind::Click, 5, 3));
        assert!(w.selected().unwrap().is_none());
    }
}
