use crossbeam_channel::{unbounded, Receiver, Sender};
use fundmap_core::config::RenderConfig;
use fundmap_core::loader::{spawn_load, LoadMsg, Source};
use fundmap_core::render::{generate_treemap_padded, RenderSession};
use fundmap_core::scene::{ContainerRegion, Surface};
use fundmap_core::search::matching_tiles;
use fundmap_core::RawNode;

pub struct AppState {
    pub source: String,
    pub config: RenderConfig,
    pub load_rx: Option<Receiver<LoadMsg>>,
    pub session: Option<RenderSession>,
    pub container: ContainerRegion,
    pub chart: Surface,
    pub legend: Surface,
    pub error: Option<String>,
    pub search: String,
    pub matches: Vec<usize>,
}

impl AppState {
    pub fn new(source: String) -> Self {
        let config = RenderConfig::default();
        let (container, chart, legend) = config.surfaces();
        Self {
            source,
            config,
            load_rx: None,
            session: None,
            container,
            chart,
            legend,
            error: None,
            search: String::new(),
            matches: Vec::new(),
        }
    }

    pub fn start_load(&mut self) {
        self.session = None;
        self.error = None;
        self.matches.clear();

        let (tx, rx): (Sender<LoadMsg>, Receiver<LoadMsg>) = unbounded();
        self.load_rx = Some(rx);
        spawn_load(Source::parse(&self.source), tx);
    }

    pub fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    /// Renders a freshly loaded document, replacing the previous session.
    pub fn render(&mut self, data: &RawNode) {
        let (container, chart, legend) = self.config.surfaces();
        self.container = container;
        self.chart = chart;
        self.legend = legend;
        match generate_treemap_padded(
            &mut self.container,
            &mut self.chart,
            &mut self.legend,
            data,
            self.config.padding,
        ) {
            Ok(session) => {
                self.session = Some(session);
                self.update_search();
            }
            Err(e) => {
                tracing::error!(error = %e, "render failed");
                self.session = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn update_search(&mut self) {
        self.matches = match &self.session {
            Some(s) => matching_tiles(&s.tiles, &self.search),
            None => Vec::new(),
        };
    }

    /// A non-blank query fades every tile it does not match, even when it
    /// matches nothing.
    pub fn is_dimmed(&self, tile: usize) -> bool {
        !self.search.trim().is_empty() && !self.matches.contains(&tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered() -> AppState {
        let mut app = AppState::new(String::new());
        app.render(&RawNode::branch(
            "root",
            vec![RawNode::branch(
                "Games",
                vec![
                    RawNode::leaf("Dice", "Games", 30.0),
                    RawNode::leaf("Cards", "Games", 20.0),
                ],
            )],
        ));
        app
    }

    #[test]
    fn query_without_hits_dims_every_tile() {
        let mut app = rendered();
        app.search = "zzzz".into();
        app.update_search();
        assert!(app.matches.is_empty());
        assert!((0..2).all(|i| app.is_dimmed(i)));
    }

    #[test]
    fn blank_query_dims_nothing() {
        let mut app = rendered();
        app.search = "   ".into();
        app.update_search();
        assert!((0..2).all(|i| !app.is_dimmed(i)));

        app.search = "dice".into();
        app.update_search();
        assert!(!app.is_dimmed(0));
        assert!(app.is_dimmed(1));
    }
}
