/// Progress notifications emitted while a molecule relaxes.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    RelaxStart { total_ticks: u64 },
    Tick { tick: u64, max_speed: f64 },
    Settled { tick: u64 },
    RelaxFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
