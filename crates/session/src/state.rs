/// Root client state
use crate::reconcile::Resolved;
use crate::SessionError;
use analysis::{AnalysisResult, Beat, BeatRef, Scene};
use api_client::{ClientError, JobId};
use tracing::{debug, info, warn};

/// Token handed out per submission; only the latest one may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// What happened to an outcome handed to [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// New result installed
    Replaced { scenes: usize, beats: usize },
    /// Error recorded; previous result kept
    Failed(String),
    /// A newer submission exists; outcome dropped
    Stale,
}

/// Details of the script behind a submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptInfo {
    pub title: String,
    /// `None` for PDF uploads
    pub text: Option<String>,
    pub length: usize,
}

/// Owns the current analysis and the beat selected in it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    result: Option<AnalysisResult>,
    selected: Option<BeatRef>,
    script: ScriptInfo,
    job_id: Option<JobId>,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session preloaded with a saved result (offline inspection).
    pub fn with_result(result: AnalysisResult) -> Self {
        Self {
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn selected(&self) -> Option<BeatRef> {
        self.selected
    }

    pub fn selected_beat(&self) -> Option<&Beat> {
        self.result.as_ref()?.beat(self.selected?)
    }

    pub fn selected_scene(&self) -> Option<&Scene> {
        self.result.as_ref()?.scene(self.selected?.scene)
    }

    pub fn script(&self) -> &ScriptInfo {
        &self.script
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts a submission: clears the error banner and issues a fresh
    /// generation, which invalidates every earlier one.
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        debug!("Submission generation {}", self.generation);
        Generation(self.generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.generation
    }

    /// Applies a finished submission if it is still the latest one.
    ///
    /// Success replaces the result and clears the selection. Failure
    /// records the message and leaves the previous result untouched.
    pub fn apply(
        &mut self,
        generation: Generation,
        script: ScriptInfo,
        outcome: Result<Resolved, ClientError>,
    ) -> Applied {
        if !self.is_current(generation) {
            warn!(
                "Discarding outcome of generation {} (latest is {})",
                generation.0, self.generation
            );
            return Applied::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(resolved) => {
                let scenes = resolved.result.scenes.len();
                let beats = resolved.result.beat_count();
                info!("Loaded analysis: {} scene(s), {} beat(s)", scenes, beats);

                self.result = Some(resolved.result);
                self.job_id = resolved.job_id;
                self.script = script;
                self.selected = None;
                self.error = None;
                Applied::Replaced { scenes, beats }
            }
            Err(err) => {
                let message = err.user_message();
                warn!("Analysis failed: {}", err);
                self.error = Some(message.clone());
                Applied::Failed(message)
            }
        }
    }

    pub fn select(&mut self, at: BeatRef) -> Result<&Beat, SessionError> {
        let result = self.result.as_ref().ok_or(SessionError::NoResult)?;
        let beat = result.beat(at).ok_or_else(|| {
            SessionError::UnknownBeat(format!("scene {} beat {}", at.scene, at.beat))
        })?;
        self.selected = Some(at);
        Ok(beat)
    }

    /// Selects the first beat whose id matches `raw`.
    pub fn select_beat(&mut self, raw: &str) -> Result<BeatRef, SessionError> {
        let result = self.result.as_ref().ok_or(SessionError::NoResult)?;
        let at = result
            .find_beat_str(raw)
            .ok_or_else(|| SessionError::UnknownBeat(raw.to_string()))?;
        self.selected = Some(at);
        Ok(at)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
