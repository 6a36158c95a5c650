use crossbeam_channel::{unbounded, Receiver, Sender};
use salesmap_core::loader::{DataSource, LoadError};
use salesmap_core::scene::Scene;
use salesmap_core::{Config, Hierarchy, Visualization};

pub enum LoadMsg {
    Done(Hierarchy),
    Error(LoadError),
}

pub struct AppState {
    pub config: Config,
    pub source: Option<DataSource>,
    pub load_rx: Option<Receiver<LoadMsg>>,
    /// Loaded but not yet drawn; drawing needs the UI's font metrics.
    pub pending: Option<Hierarchy>,
    pub vis: Option<Visualization>,
    /// Treemap and legend scenes of `vis`.
    pub scenes: Option<(Scene, Scene)>,
    pub error: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            source: None,
            load_rx: None,
            pending: None,
            vis: None,
            scenes: None,
            error: None,
        }
    }

    /// Fetch on a worker thread; the UI polls `load_rx` each frame.
    pub fn start_load(&mut self, source: DataSource) {
        self.source = Some(source.clone());
        self.pending = None;
        self.vis = None;
        self.scenes = None;
        self.error = None;

        let (tx, rx): (Sender<LoadMsg>, Receiver<LoadMsg>) = unbounded();
        self.load_rx = Some(rx);

        std::thread::spawn(move || {
            let msg = match source.load() {
                Ok(tree) => LoadMsg::Done(tree),
                Err(e) => LoadMsg::Error(e),
            };
            // The receiver may be gone if another load replaced this one.
            let _ = tx.send(msg);
        });
    }

    pub fn load_default(&mut self) {
        match DataSource::parse(&self.config.data_url) {
            Ok(source) => self.start_load(source),
            Err(e) => self.fail(e),
        }
    }

    pub fn fail(&mut self, e: LoadError) {
        tracing::error!("error fetching data: {e}");
        self.error = Some(e.to_string());
        self.load_rx = None;
    }
}
