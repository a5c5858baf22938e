//! Everything a command needs to look at or change the machine.

use std::path::PathBuf;
use std::rc::Rc;

use crate::backend::{BackendOptions, BackendSet};
use crate::config::{EnvbootConfig, Settings};
use crate::executor::Executor;
use crate::path::{PathMutator, ProcessEnv, SessionEnv};
use crate::probe::{detect_platform, Platform, SystemToolProbe, ToolProbe};
use crate::requirements::Requirement;
use crate::shell::{is_elevated, CommandRunner, SystemRunner};

/// The machine as commands see it: platform, requirements, probe,
/// backends and PATH mutator.
pub struct MachineContext {
    pub platform: Platform,
    pub requirements: Vec<Requirement>,
    pub settings: Settings,
    pub probe: Box<dyn ToolProbe>,
    pub backends: BackendSet,
    pub path: Option<PathMutator>,
    network: Option<Box<dyn Fn() -> bool>>,
}

impl MachineContext {
    /// The live machine. `interactive` says whether installers may prompt
    /// the user.
    pub fn system(config: EnvbootConfig, interactive: bool) -> Self {
        let platform = detect_platform();
        let runner: Rc<dyn CommandRunner> = Rc::new(SystemRunner);
        let options = BackendOptions {
            use_sudo: !is_elevated(),
            npm_prefix: config.settings.resolved_npm_prefix(),
            npm_user_prefix: dirs::home_dir().map(|home| home.join(".npm-global")),
            interactive,
        };
        let backends = BackendSet::system(runner.clone(), &options);

        let session: Rc<dyn SessionEnv> = Rc::new(ProcessEnv);
        let path = match PathMutator::for_platform(session, &platform) {
            Ok(mutator) => Some(mutator),
            Err(e) => {
                tracing::warn!("PATH updates disabled: {}", e);
                None
            }
        };

        Self {
            platform,
            requirements: config.effective_requirements(),
            settings: config.settings,
            probe: Box::new(SystemToolProbe::with_runner(runner)),
            backends,
            path,
            network: None,
        }
    }

    /// Assemble a context from parts. Used with the fake backends.
    pub fn new(
        platform: Platform,
        requirements: Vec<Requirement>,
        probe: Box<dyn ToolProbe>,
        backends: BackendSet,
    ) -> Self {
        Self {
            platform,
            requirements,
            settings: Settings::default(),
            probe,
            backends,
            path: None,
            network: None,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_path_mutator(mut self, mutator: PathMutator) -> Self {
        self.path = Some(mutator);
        self
    }

    /// Replace the connectivity probe.
    pub fn with_network_probe(mut self, probe: impl Fn() -> bool + 'static) -> Self {
        self.network = Some(Box::new(probe));
        self
    }

    /// An executor over this context's backends, probe and PATH mutator.
    pub fn executor(&self, check_network: bool) -> Executor<'_> {
        let mut executor = Executor::new(&self.backends, self.probe.as_ref(), self.platform)
            .check_network(check_network && self.settings.check_network());
        if let Some(mutator) = &self.path {
            executor = executor.with_path_mutator(mutator);
        }
        if let Some(network) = &self.network {
            executor = executor.with_network_probe(move || network());
        }
        executor
    }

    /// Configured extra PATH directories.
    pub fn path_dirs(&self) -> Vec<PathBuf> {
        self.settings.resolved_path_dirs()
    }
}
