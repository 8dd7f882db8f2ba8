//! Per-service markdown templates for the mock backend.

use forge_domain::{ServiceType, SubjectContext};

fn bullets<'a>(items: impl IntoIterator<Item = &'a String>, empty: &str) -> String {
    let lines: Vec<String> = items.into_iter().map(|item| format!("- {}", item)).collect();
    if lines.is_empty() {
        format!("- {}", empty)
    } else {
        lines.join("\n")
    }
}

/// Render the document for `service` from the subject's context.
pub(super) fn render(service: ServiceType, context: &SubjectContext, today: &str) -> String {
    let profile = &context.profile;
    let name = if profile.name.trim().is_empty() {
        "학생"
    } else {
        profile.name.as_str()
    };
    let grade = profile.grade.max(1);
    let disabilities = profile.disability_types.join(", ");
    let support = bullets(&context.support_needs, "지원 요구 정보 없음");

    match service {
        ServiceType::CurriculumAssignment => format!(
            "# {name}님을 위한 개별화 교육과정 배정\n\n\
             ## 학습자 분석\n\
             - 현재 학년: {grade}학년\n\
             - 장애 유형: {disabilities}\n\
             - 통합교육 유형: {integration}\n\n\
             ## 권장 교육과정\n\
             1. **기초 학습 영역**\n   \
             - 국어: 기능적 읽기, 의사소통 중심\n   \
             - 수학: 생활수학, 실용수학 중심\n   \
             - 사회: 지역사회 적응 기능\n\n\
             2. **개별화 요소**\n   \
             - 학습 속도 조절\n   \
             - 시각적 보조 자료 활용\n   \
             - 단계별 학습 진행\n\n\
             ## 지원 방안\n{support}\n\n\
             이 교육과정은 {name}님의 개별 특성과 요구를 반영하여 구성되었습니다.",
            integration = profile.integration_type,
        ),
        ServiceType::LessonPlan => format!(
            "# {name}님을 위한 주간 교육계획\n\n\
             ## 주간 목표\n\
             - 기능적 의사소통 능력 향상\n\
             - 일상생활 기술 습득\n\
             - 사회적 상호작용 증진\n\n\
             ## 일일 계획\n\n\
             ### 월요일 - 국어 (의사소통)\n\
             **목표**: 요구사항을 문장으로 표현하기\n\
             **활동**:\n\
             - 그림카드를 이용한 어휘 학습\n\
             - 역할놀이를 통한 대화 연습\n\
             - 일기 쓰기 (단어/문장 수준)\n\n\
             ### 화요일 - 수학 (생활수학)\n\
             **목표**: 돈의 개념과 사용법 이해\n\
             **활동**:\n\
             - 동전과 지폐 구분하기\n\
             - 간단한 계산 연습\n\
             - 마트놀이를 통한 실습\n\n\
             ### 수요일 - 사회 (지역사회)\n\
             **목표**: 대중교통 이용법 익히기\n\
             **활동**:\n\
             - 버스정류장 찾기\n\
             - 교통카드 사용법\n\
             - 안전규칙 학습\n\n\
             ## 개별 지원 사항\n{support}"
        ),
        ServiceType::Assessment => format!(
            "# {name}님 교육평가 보고서\n\n\
             ## 평가 개요\n\
             - 평가 기간: 최근 1개월\n\
             - 평가 영역: 학습능력, 사회성, 자립생활\n\
             - 평가 방법: 관찰, 포트폴리오, 실기평가\n\n\
             ## 영역별 현재 수준\n{levels}\n\n\
             ## 최근 평가\n{assessments}\n\n\
             ## 개선 방안\n\
             1. 문장 구성 능력 향상을 위한 개별 지도\n\
             2. 문제 해결력 증진을 위한 단계별 접근\n\
             3. 집단 활동 참여 독려 프로그램\n\n\
             ## 향후 목표\n{goals}",
            levels = levels(context),
            assessments = bullets(
                &context
                    .recent_assessments
                    .iter()
                    .map(|a| format!("{} ({}): {}점, {}", a.kind, a.subject, a.score, a.notes))
                    .collect::<Vec<_>>(),
                "평가 기록 없음",
            ),
            goals = bullets(&context.goals.long_term, "목표 설정 필요"),
        ),
        ServiceType::AdminDocument => format!(
            "# 학생 진전 상황 보고서\n\n\
             **대상 학생**: {name}\n\
             **작성일**: {today}\n\
             **작성자**: 담당 특수교사\n\n\
             ## 1. 학생 기본 정보\n\
             - 학년: {grade}학년\n\
             - 장애 유형: {disabilities}\n\
             - 통합교육 형태: {integration}\n\n\
             ## 2. 현재 수행 수준\n{levels}\n\n\
             ## 3. 주요 성과\n\
             - 의사소통 능력의 지속적인 향상\n\
             - 일상생활 기능의 안정적 수행\n\
             - 사회적 상호작용 기술 발전\n\n\
             ## 4. 지원 현황\n\
             현재 제공되고 있는 지원 서비스:\n{support}\n\n\
             ## 5. 향후 계획\n\
             - 개별화교육계획(IEP) 수정 및 보완\n\
             - 지역사회 적응 프로그램 참여 확대\n\
             - 가족 및 관련 전문가와의 협력 강화\n\n\
             본 보고서는 {name} 학생의 교육적 발전을 위한 지속적인 지원 계획의 기초자료로 활용됩니다.",
            integration = profile.integration_type,
            levels = levels(context),
        ),
        ServiceType::CounselingGuide => format!(
            "# {name}님 상담 가이드\n\n\
             ## 상담 목표\n\
             - 정서적 안정감 증진\n\
             - 자기표현 능력 향상\n\
             - 스트레스 관리 기술 습득\n\n\
             ## 현재 상태 분석\n\
             **정서 상태**: {state}\n\
             **행동 특성**:\n{behaviors}\n\n\
             ## 상담 접근 방법\n\n\
             ### 1. 라포 형성\n\
             - 학생이 좋아하는 활동을 통한 관계 형성\n\
             - 비언어적 의사소통 활용\n\
             - 안전하고 편안한 환경 조성\n\n\
             ### 2. 감정 표현 지원\n\
             - 감정카드를 이용한 감정 인식 연습\n\
             - 그림이나 만들기를 통한 감정 표현\n\
             - 단순하고 명확한 언어 사용\n\n\
             ### 3. 문제 행동 개선\n\
             - 긍정적 행동 강화\n\
             - 대안 행동 제시 및 연습\n\
             - 예측 가능한 일과와 규칙 제공\n\n\
             ## 가족 지원 방안\n\
             - 가정에서의 일관된 접근법 안내\n\
             - 부모 교육 및 상담 제공\n\
             - 정기적인 소통과 피드백\n\n\
             이 가이드는 {name}님의 개별적 특성을 고려하여 작성되었으며, 지속적인 관찰과 평가를 통해 수정 보완되어야 합니다.",
            state = if context.wellbeing.current_state.is_empty() {
                "안정"
            } else {
                context.wellbeing.current_state.as_str()
            },
            behaviors = bullets(&context.observations.behaviors, "관찰 데이터 수집 중"),
        ),
    }
}

fn levels(context: &SubjectContext) -> String {
    bullets(
        &context
            .current_levels
            .iter()
            .map(|(area, level)| format!("{}: {}", area, level))
            .collect::<Vec<_>>(),
        "수행 수준 정보 없음",
    )
}
