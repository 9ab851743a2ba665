//! Flow service: personalized study plans and usage analytics.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use studydeck_common::{AppError, AppResult};
use studydeck_db::entities::study_board;
use studydeck_db::repositories::{GroupRepository, StudyBoardRepository};

use super::ai::{AiError, FLOW_MAX_OUTPUT_TOKENS, GeminiClient};

/// Estimated minutes of study per recorded activity.
const MINUTES_PER_ACTIVITY: u64 = 45;

/// Days covered by the analytics timeline.
const ANALYTICS_WINDOW_DAYS: i64 = 30;

/// Estimated study minutes for a number of activities.
#[must_use]
pub const fn estimated_minutes(activities: u64) -> u64 {
    activities * MINUTES_PER_ACTIVITY
}

/// Consistency score: percentage of the last 7 days with activity, capped
/// at 100.
#[must_use]
pub fn consistency_score(active_days_last_week: u64) -> u64 {
    (active_days_last_week * 100 / 7).min(100)
}

/// Progress tier for a total board count.
#[must_use]
pub const fn progress_tier(total_boards: u64) -> &'static str {
    if total_boards < 5 {
        "Getting Started"
    } else if total_boards < 15 {
        "Building Momentum"
    } else if total_boards < 30 {
        "Consistent Learner"
    } else {
        "Advanced Learner"
    }
}

/// Classify a video title into a coarse subject bucket by keyword.
#[must_use]
pub fn classify_subject(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    const TABLE: [(&str, &[&str]); 5] = [
        (
            "Mathematics",
            &["math", "calculus", "algebra", "geometry", "statistics"],
        ),
        (
            "Science",
            &["physics", "chemistry", "biology", "science", "astronomy"],
        ),
        (
            "Programming",
            &[
                "programming",
                "coding",
                "javascript",
                "python",
                "rust",
                "software",
                "algorithm",
            ],
        ),
        ("History", &["history", "historical", "civilization"]),
        (
            "Language Arts",
            &["english", "grammar", "writing", "literature", "language"],
        ),
    ];

    for (subject, keywords) in TABLE {
        if keywords.iter().any(|k| lower.contains(k)) {
            return subject;
        }
    }
    "General"
}

/// Infer a learning style from the activity mix.
///
/// Heavy chat usage reads as interactive, heavy board usage as structured,
/// anything else as visual.
#[must_use]
pub fn learning_style(board_count: u64, message_count: u64) -> &'static str {
    let total = board_count + message_count;
    if total == 0 {
        return "visual";
    }
    let chat_ratio = message_count as f64 / total as f64;
    let board_ratio = board_count as f64 / total as f64;

    if chat_ratio > 0.4 {
        "interactive"
    } else if board_ratio > 0.5 {
        "structured"
    } else {
        "visual"
    }
}

/// Input for generating a study flow plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlowInput {
    pub user_id: String,
    pub goal: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub current_level: Option<String>,
}

/// Derived usage metrics attached to flow and analytics responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetrics {
    pub total_boards: u64,
    pub total_messages: u64,
    pub estimated_study_minutes: u64,
    pub consistency: u64,
    pub progress_rate: &'static str,
    pub subjects: Vec<SubjectCount>,
    pub learning_style: &'static str,
}

/// Boards counted per subject bucket.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCount {
    pub subject: &'static str,
    pub count: u64,
}

/// A generated study plan plus the metrics it was derived from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub flow: Value,
    pub metrics: UsageMetrics,
}

/// One day in the analytics timeline.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    pub date: String,
    pub activities: u64,
    pub estimated_minutes: u64,
}

/// 30-day activity analytics for a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub timeline: Vec<DayActivity>,
    pub metrics: UsageMetrics,
}

/// Service for flow plans and analytics.
#[derive(Clone)]
pub struct FlowService {
    board_repo: StudyBoardRepository,
    group_repo: GroupRepository,
    ai: GeminiClient,
}

impl FlowService {
    /// Create a new flow service.
    #[must_use]
    pub const fn new(
        board_repo: StudyBoardRepository,
        group_repo: GroupRepository,
        ai: GeminiClient,
    ) -> Self {
        Self {
            board_repo,
            group_repo,
            ai,
        }
    }

    /// Generate a 6-step personalized study plan.
    pub async fn generate_flow(&self, input: GenerateFlowInput) -> AppResult<FlowResponse> {
        let goal = input.goal.trim();
        if goal.is_empty() {
            return Err(AppError::Validation("Goal must not be empty".to_string()));
        }

        let metrics = self.compute_metrics(&input.user_id).await?;

        let prompt = build_flow_prompt(
            goal,
            input.timeframe.as_deref(),
            input.current_level.as_deref(),
            &metrics,
        );

        let flow = self.ai.generate_json(&prompt, FLOW_MAX_OUTPUT_TOKENS).await?;
        validate_flow_plan(&flow)?;

        Ok(FlowResponse { flow, metrics })
    }

    /// 30-day activity timeline plus summary stats.
    pub async fn analytics(&self, user_id: &str) -> AppResult<AnalyticsResponse> {
        let boards = self.board_repo.find_by_user_id(user_id).await?;
        let metrics = self.metrics_from_boards(user_id, &boards).await?;

        let today = Utc::now().date_naive();
        let mut timeline = Vec::with_capacity(ANALYTICS_WINDOW_DAYS as usize);
        for offset in (0..ANALYTICS_WINDOW_DAYS).rev() {
            let day = today - Duration::days(offset);
            let activities = boards
                .iter()
                .filter(|b| b.created_at.date_naive() == day)
                .count() as u64;
            timeline.push(DayActivity {
                date: day.format("%Y-%m-%d").to_string(),
                activities,
                estimated_minutes: estimated_minutes(activities),
            });
        }

        Ok(AnalyticsResponse { timeline, metrics })
    }

    async fn compute_metrics(&self, user_id: &str) -> AppResult<UsageMetrics> {
        let boards = self.board_repo.find_by_user_id(user_id).await?;
        self.metrics_from_boards(user_id, &boards).await
    }

    async fn metrics_from_boards(
        &self,
        user_id: &str,
        boards: &[study_board::Model],
    ) -> AppResult<UsageMetrics> {
        let total_boards = self.board_repo.count_by_user_id(user_id).await?;
        let total_messages = self.group_repo.count_messages_by_user(user_id).await?;

        let today = Utc::now().date_naive();
        let week_ago = today - Duration::days(6);
        let active_days = boards
            .iter()
            .map(|b| b.created_at.date_naive())
            .filter(|d| *d >= week_ago && *d <= today)
            .collect::<std::collections::HashSet<_>>()
            .len() as u64;

        let mut subject_counts: Vec<SubjectCount> = Vec::new();
        for board in boards {
            let subject = classify_subject(&board.video_title);
            match subject_counts.iter_mut().find(|s| s.subject == subject) {
                Some(entry) => entry.count += 1,
                None => subject_counts.push(SubjectCount { subject, count: 1 }),
            }
        }
        subject_counts.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(UsageMetrics {
            total_boards,
            total_messages,
            estimated_study_minutes: estimated_minutes(total_boards + total_messages),
            consistency: consistency_score(active_days),
            progress_rate: progress_tier(total_boards),
            subjects: subject_counts,
            learning_style: learning_style(total_boards, total_messages),
        })
    }
}

/// Validate the shape of a generated flow plan.
fn validate_flow_plan(flow: &Value) -> Result<(), AiError> {
    let steps = flow
        .get("steps")
        .and_then(Value::as_array)
        .ok_or_else(|| AiError::MalformedContent("Flow plan has no steps array".to_string()))?;

    if steps.is_empty() {
        return Err(AiError::MalformedContent(
            "Flow plan has no steps".to_string(),
        ));
    }
    Ok(())
}

fn build_flow_prompt(
    goal: &str,
    timeframe: Option<&str>,
    current_level: Option<&str>,
    metrics: &UsageMetrics,
) -> String {
    format!(
        r#"You are a study coach. Create a personalized 6-step study plan as a single JSON object with exactly these fields:
- "steps": an array of 6 objects, each with "title", "description", "duration", "keyActivities" (array of strings), "resources" (array of strings), and "color" (a hex color string)
- "motivationalMessage": a short encouraging sentence

Respond with JSON only, no extra commentary.

Goal: {goal}
Timeframe: {timeframe}
Current level: {level}
Learner context: {boards} study boards created, consistency {consistency}%, progress tier "{tier}", preferred style "{style}"."#,
        timeframe = timeframe.unwrap_or("not specified"),
        level = current_level.unwrap_or("not specified"),
        boards = metrics.total_boards,
        consistency = metrics.consistency,
        tier = metrics.progress_rate,
        style = metrics.learning_style,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_estimated_minutes() {
        assert_eq!(estimated_minutes(0), 0);
        assert_eq!(estimated_minutes(3), 135);
    }

    #[test]
    fn test_consistency_score() {
        assert_eq!(consistency_score(0), 0);
        assert_eq!(consistency_score(7), 100);
        assert_eq!(consistency_score(3), 42);
        assert_eq!(consistency_score(14), 100);
    }

    #[test]
    fn test_progress_tiers() {
        assert_eq!(progress_tier(0), "Getting Started");
        assert_eq!(progress_tier(4), "Getting Started");
        assert_eq!(progress_tier(5), "Building Momentum");
        assert_eq!(progress_tier(14), "Building Momentum");
        assert_eq!(progress_tier(15), "Consistent Learner");
        assert_eq!(progress_tier(29), "Consistent Learner");
        assert_eq!(progress_tier(30), "Advanced Learner");
    }

    #[test]
    fn test_classify_subject() {
        assert_eq!(classify_subject("Intro to Calculus"), "Mathematics");
        assert_eq!(classify_subject("Rust programming tutorial"), "Programming");
        assert_eq!(classify_subject("The History of Rome"), "History");
        assert_eq!(classify_subject("Organic Chemistry Basics"), "Science");
        assert_eq!(classify_subject("Cooking with cast iron"), "General");
    }

    #[test]
    fn test_learning_style() {
        assert_eq!(learning_style(0, 0), "visual");
        assert_eq!(learning_style(1, 9), "interactive");
        assert_eq!(learning_style(9, 1), "structured");
        assert_eq!(learning_style(5, 5), "interactive");
    }

    #[test]
    fn test_validate_flow_plan() {
        assert!(validate_flow_plan(&json!({"steps": [{"title": "x"}]})).is_ok());
        assert!(validate_flow_plan(&json!({"steps": []})).is_err());
        assert!(validate_flow_plan(&json!({"plan": []})).is_err());
    }
}
