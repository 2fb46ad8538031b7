//! VisibilityScheduler - Background job publishing scheduled course content.
//!
//! Every tick performs one bulk update through
//! [`CourseRepository::publish_due_contents`]: each hidden content whose
//! `visible_from` has passed becomes visible.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 60s | Time between ticks |
//!
//! ## Graceful Shutdown
//!
//! A tick in progress always completes. The loop exits on the next
//! shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::CourseRepository;

#[derive(Debug, Clone)]
pub struct VisibilitySchedulerConfig {
    pub interval: Duration,
}

impl Default for VisibilitySchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

impl VisibilitySchedulerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

pub struct VisibilityScheduler {
    courses: Arc<dyn CourseRepository>,
    config: VisibilitySchedulerConfig,
}

impl VisibilityScheduler {
    pub fn new(courses: Arc<dyn CourseRepository>, config: VisibilitySchedulerConfig) -> Self {
        Self { courses, config }
    }

    /// Run ticks until the shutdown signal flips to `true`.
    ///
    /// A failed tick is logged and retried on the next interval.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        info!(interval_secs = self.config.interval.as_secs(), "Visibility scheduler started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Visibility scheduler stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.run_once(Timestamp::now()).await {
                        warn!(error = %e, "Visibility tick failed");
                    }
                }
            }
        }
    }

    /// Publish everything due at `now`; returns the number of contents published.
    pub async fn run_once(&self, now: Timestamp) -> Result<u64, DomainError> {
        let published = self.courses.publish_due_contents(now).await?;
        if published > 0 {
            info!(published, "Scheduled contents published");
        } else {
            debug!("No scheduled contents due");
        }
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::course::{Content, ContentKind, Course, Section};
    use crate::domain::foundation::{ContentId, InstituteId, Role};
    use crate::domain::user::{RoleRecord, User};
    use crate::ports::UserRepository;

    /// Course whose contents are hidden and scheduled `delays` seconds from now.
    async fn course_with_scheduled(store: &InMemoryStore, delays: &[i64]) -> (Course, Timestamp) {
        let teacher = User::new(InstituteId::new(), "t@school.test", "Tom", "Tester", "h".into(), Role::Teacher)
            .unwrap();
        let record = RoleRecord::empty_for(Role::Teacher, *teacher.id(), *teacher.institute_id());
        UserRepository::create(store, &teacher, record.as_ref()).await.unwrap();

        let mut course = Course::new(*teacher.institute_id(), *teacher.id(), "Physics", "").unwrap();
        let section = Section::new("Week 1").unwrap();
        let section_id = section.id;
        course.add_section(section);
        let now = Timestamp::now();
        for (i, delay) in delays.iter().enumerate() {
            let content = Content {
                id: ContentId::new(),
                title: format!("Part {}", i),
                kind: ContentKind::Text,
                body: String::new(),
                visible: false,
                visible_from: Some(now.plus_secs(*delay)),
            };
            course.add_content(&section_id, content).unwrap();
        }
        CourseRepository::create(store, &course).await.unwrap();
        (course, now)
    }

    #[tokio::test]
    async fn run_once_publishes_only_due_contents() {
        let store = InMemoryStore::new();
        let (course, now) = course_with_scheduled(&store, &[60, 120, 3600]).await;
        let scheduler = VisibilityScheduler::new(Arc::new(store.clone()), VisibilitySchedulerConfig::default());

        assert_eq!(scheduler.run_once(now).await.unwrap(), 0);
        assert_eq!(scheduler.run_once(now.plus_secs(300)).await.unwrap(), 2);
        assert_eq!(scheduler.run_once(now.plus_secs(300)).await.unwrap(), 0);

        let stored = CourseRepository::find_by_id(&store, course.id()).await.unwrap().unwrap();
        let visible: Vec<bool> = stored.sections()[0].contents.iter().map(|c| c.visible).collect();
        assert_eq!(visible, vec![true, true, false]);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let store = InMemoryStore::new();
        let (course, _) = course_with_scheduled(&store, &[-1]).await;
        let config = VisibilitySchedulerConfig::default().with_interval(Duration::from_millis(10));
        let scheduler = VisibilityScheduler::new(Arc::new(store.clone()), config);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();

        let stored = CourseRepository::find_by_id(&store, course.id()).await.unwrap().unwrap();
        assert!(stored.sections()[0].contents[0].visible);
    }

    #[test]
    fn default_interval_is_one_minute() {
        assert_eq!(VisibilitySchedulerConfig::default().interval, Duration::from_secs(60));
    }
}
