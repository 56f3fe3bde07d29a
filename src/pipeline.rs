use crate::category::Category;
use crate::classifier::AiScan;
use crate::config::Config;
use crate::email::EmailRecord;
use crate::prefilter::BasicScan;

/// The full two-stage scan: cheap local rules first, the model only when
/// they have no opinion. Construction compiles the pre-filter rules;
/// scanning never fails, it degrades.
pub struct ScanPipeline {
    prefilter: BasicScan,
    classifier: AiScan,
}

impl ScanPipeline {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(ScanPipeline {
            prefilter: BasicScan::new(config)?,
            classifier: AiScan::new(config),
        })
    }

    /// Classify one email. A non-default pre-filter verdict is terminal and
    /// returns without any network call.
    pub async fn scan(&self, email: &EmailRecord) -> Category {
        let narrowed = self.prefilter.narrow(email);
        if narrowed != Category::Unfiltered {
            log::info!(
                "pre-filter decided {narrowed} for email from {}",
                email.sender
            );
            return narrowed;
        }

        self.classifier
            .classify(&email.sender, &email.message, narrowed)
            .await
    }

    /// The pre-filter stage alone, for basic-only scans.
    pub fn prefilter(&self) -> &BasicScan {
        &self.prefilter
    }
}
