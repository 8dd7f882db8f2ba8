//! Sample-data subject provider used until a real student store is wired in.

use async_trait::async_trait;
use forge_application::{ProviderError, SubjectDataProvider};
use forge_domain::subject::{
    ActivityRecord, AssessmentRecord, SubjectAnalytics, SubjectContext, SubjectGoals,
    SubjectObservations, SubjectPreferences, SubjectProfile, Wellbeing,
};
use std::time::Duration;
use tracing::debug;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build the sample student context, keyed by `subject_id`.
pub fn sample_subject(subject_id: &str) -> SubjectContext {
    SubjectContext {
        profile: SubjectProfile {
            id: subject_id.to_string(),
            name: "김철수".to_string(),
            grade: 3,
            disability_types: strings(&["지적장애", "의사소통장애"]),
            integration_type: "부분통합".to_string(),
        },
        current_levels: [("reading", "초급"), ("math", "기초"), ("social", "중급")]
            .into_iter()
            .map(|(area, level)| (area.to_string(), level.to_string()))
            .collect(),
        recent_activities: vec![ActivityRecord {
            kind: "학습".to_string(),
            description: "한글 읽기 연습".to_string(),
            date: "2024-01-15".to_string(),
            outcome: "5개 단어 성공적으로 읽음".to_string(),
        }],
        support_needs: strings(&["시각적 지원", "단계별 설명", "충분한 대기시간"]),
        goals: SubjectGoals {
            short_term: strings(&["기본 의사소통", "생활 어휘 습득"]),
            long_term: strings(&["자립적 생활", "사회 적응"]),
            target_skills: strings(&["읽기", "쓰기", "기본 수학"]),
        },
        preferences: SubjectPreferences {
            subjects: strings(&["국어", "생활"]),
            teaching_methods: strings(&["시각적 자료", "체험 활동"]),
            session_minutes: 30,
        },
        analytics: SubjectAnalytics {
            strengths: strings(&["기억력", "집중력"]),
            improvements: strings(&["표현력", "문제해결"]),
            average_pace: "slow".to_string(),
        },
        recent_assessments: vec![AssessmentRecord {
            kind: "진단평가".to_string(),
            subject: "국어".to_string(),
            score: 65,
            date: "2024-01-10".to_string(),
            notes: "기본 어휘 이해 양호".to_string(),
        }],
        observations: SubjectObservations {
            behaviors: strings(&["차분함", "집중력 양호", "도움 요청 적극적"]),
            social_interactions: strings(&["또래와 우호적", "성인과 예의 바름"]),
            communication_patterns: strings(&["단순 문장 선호", "시각적 단서 필요"]),
        },
        wellbeing: Wellbeing {
            current_state: "stable".to_string(),
            concerns: Vec::new(),
            interventions: Vec::new(),
        },
    }
}

/// Provider that answers every id with [`sample_subject`] after a short delay
pub struct MockSubjectDataProvider {
    latency: Duration,
}

impl MockSubjectDataProvider {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(500),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for MockSubjectDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubjectDataProvider for MockSubjectDataProvider {
    async fn fetch(&self, subject_id: &str) -> Result<SubjectContext, ProviderError> {
        if subject_id.trim().is_empty() {
            return Err(ProviderError::NotFound(subject_id.to_string()));
        }

        debug!("Loading sample subject data for {}", subject_id);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(sample_subject(subject_id))
    }
}
