use crate::error::TopologyResult;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use crate::report;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::{info, warn};

/// A query that needs two nodes from the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    LatencyPath,
    MaxBandwidth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Prompt(Query),
}

pub static MENU: [(char, &str); 6] = [
    ('1', "Lowest-latency path between two nodes"),
    ('2', "Copper-only connectivity"),
    ('3', "Maximum bandwidth between two nodes"),
    ('4', "Lowest-latency spanning tree from node 0"),
    ('5', "Critical node pairs"),
    ('6', "Quit"),
];

/// Parses "FROM TO": exactly two non-negative integers.
pub fn parse_pair(input: &str) -> Result<(NodeId, NodeId), String> {
    let fields: Vec<&str> = input.split_whitespace().collect();
    let [from, to] = fields.as_slice() else {
        return Err(format!("expected two vertices, got {}", fields.len()));
    };
    let node = |text: &str| {
        text.parse::<usize>()
            .map(NodeId)
            .map_err(|_| format!("'{text}' is not a vertex"))
    };
    Ok((node(*from)?, node(*to)?))
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub input: String,
    pub scroll: u16,
    topology: Topology,
    settings: Settings,
    name: String,
    output: Vec<String>,
}

impl App {
    pub fn new(topology: Topology, settings: Settings, name: String) -> Self {
        Self {
            running: true,
            mode: Mode::Menu,
            input: String::new(),
            scroll: 0,
            topology,
            settings,
            name,
            output: vec!["Select an option".to_owned()],
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            Mode::Menu => self.handle_menu_key(key.code),
            Mode::Prompt(query) => self.handle_prompt_key(query, key.code),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(option) => self.select(option),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, query: Query, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit(query),
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Menu;
            }
            _ => {}
        }
    }

    pub fn select(&mut self, option: char) {
        match option {
            '1' => self.prompt(Query::LatencyPath),
            '3' => self.prompt(Query::MaxBandwidth),
            '2' => self.show(Ok(report::copper(&self.topology))),
            '4' => self.show(Ok(report::spanning_tree(&self.topology))),
            '5' => {
                let lines = report::critical_pairs(
                    &mut self.topology,
                    self.settings.strategy,
                    self.settings.strict,
                );
                self.show(lines);
            }
            '6' => self.running = false,
            _ => {}
        }
    }

    fn prompt(&mut self, query: Query) {
        self.input.clear();
        self.mode = Mode::Prompt(query);
    }

    fn submit(&mut self, query: Query) {
        let input = std::mem::take(&mut self.input);
        self.mode = Mode::Menu;

        let (from, to) = match parse_pair(&input) {
            Ok(pair) => pair,
            Err(reason) => {
                self.output = vec![
                    "Please enter two vertices, separated by a space.".to_owned(),
                    reason,
                ];
                self.scroll = 0;
                return;
            }
        };

        info!(?query, from = from.index(), to = to.index(), "query submitted");
        let lines = match query {
            Query::LatencyPath => report::latency_path(&self.topology, from, to),
            Query::MaxBandwidth => {
                report::max_bandwidth(&mut self.topology, from, to, self.settings.flow_mode)
            }
        };
        self.show(lines);
    }

    fn show(&mut self, lines: TopologyResult<Vec<String>>) {
        self.output = lines.unwrap_or_else(|e| {
            warn!(error = %e, "query failed");
            vec![format!("Error: {e}")]
        });
        self.scroll = 0;
    }
}
