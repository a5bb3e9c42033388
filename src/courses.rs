use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    View,
    Walk,
    Food,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CourseStop {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub kind: StopKind,
    pub desc: &'static str,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Course {
    pub title: &'static str,
    pub stops: &'static [CourseStop],
}

const fn stop(
    name: &'static str,
    lat: f64,
    lng: f64,
    kind: StopKind,
    desc: &'static str,
) -> CourseStop {
    CourseStop {
        name,
        lat,
        lng,
        kind,
        desc,
    }
}

use StopKind::{Food, View, Walk};

pub static COURSES: [Course; 6] = [
    Course {
        title: "🌳 Theme 1: 숲과 힐링 (티어가르텐)",
        stops: &[
            stop("1. 전승기념탑", 52.5145, 13.3501, View, "베를린 전경이 한눈에 보이는 황금 천사상"),
            stop("2. 티어가르텐 산책", 52.5135, 13.3575, Walk, "도심 속 거대한 허파, 맑은 공기 마시기"),
            stop("3. Cafe am Neuen See", 52.5076, 13.3448, Food, "호수 바로 앞, 피자와 맥주가 맛있는 비어가든"),
            stop("4. 베를린 동물원", 52.5079, 13.3377, View, "세계 최대 종을 보유한 역사 깊은 동물원"),
            stop("5. Monkey Bar", 52.5049, 13.3353, Food, "동물원 원숭이를 내려다보며 칵테일 한잔"),
            stop("6. 카이저 빌헬름 교회", 52.5048, 13.3350, View, "전쟁의 참상을 기억하기 위해 보존된 교회"),
        ],
    },
    Course {
        title: "🎨 Theme 2: 예술과 고전 (박물관 섬)",
        stops: &[
            stop("1. 베를린 돔", 52.5190, 13.4010, View, "웅장한 돔 지붕 위에서 보는 시내 뷰"),
            stop("2. 구 국립 미술관", 52.5208, 13.3982, View, "그리스 신전 같은 외관과 19세기 회화"),
            stop("3. 제임스 사이먼 공원", 52.5213, 13.4005, Walk, "슈프레 강변에 앉아 쉬어가는 핫플"),
            stop("4. Hackescher Hof", 52.5246, 13.4020, View, "아르누보 양식의 아름다운 8개 안뜰"),
            stop("5. Monsieur Vuong", 52.5244, 13.4085, Food, "줄 서서 먹는 베트남 쌀국수 맛집"),
            stop("6. Zeit für Brot", 52.5265, 13.4090, Food, "시나몬 롤이 입에서 녹는 베이커리"),
        ],
    },
    Course {
        title: "🏰 Theme 3: 분단의 역사 (장벽 투어)",
        stops: &[
            stop("1. 베를린 장벽 기념관", 52.5352, 13.3903, View, "장벽이 실제 모습 그대로 보존된 곳"),
            stop("2. Mauerpark", 52.5404, 13.4048, Walk, "일요일 벼룩시장과 가라오케"),
            stop("3. Prater Beer Garden", 52.5399, 13.4101, Food, "베를린에서 가장 오래된 야외 맥주집"),
            stop("4. 체크포인트 찰리", 52.5074, 13.3904, View, "분단 시절 검문소"),
            stop("5. Topography of Terror", 52.5065, 13.3835, View, "나치 비밀경찰 본부 터 역사관"),
            stop("6. Mall of Berlin", 52.5106, 13.3807, Food, "식사와 쇼핑을 해결하는 대형 몰"),
        ],
    },
    Course {
        title: "🕶️ Theme 4: 힙스터 성지 (크로이츠베르크)",
        stops: &[
            stop("1. 오버바움 다리", 52.5015, 13.4455, View, "가장 아름다운 붉은 벽돌 다리"),
            stop("2. 이스트 사이드 갤러리", 52.5050, 13.4397, Walk, "형제의 키스 그림이 있는 야외 갤러리"),
            stop("3. Burgermeister", 52.5005, 13.4420, Food, "다리 밑 공중화장실을 개조한 힙한 버거집"),
            stop("4. Markthalle Neun", 52.5020, 13.4310, Food, "트렌디한 실내 시장과 스트릿 푸드"),
            stop("5. Voo Store", 52.5005, 13.4215, View, "패션 피플들의 숨겨진 편집샵"),
            stop("6. Landwehr Canal", 52.4960, 13.4150, Walk, "운하를 따라 걷는 평화로운 산책로"),
        ],
    },
    Course {
        title: "🛍️ Theme 5: 럭셔리 & 쇼핑 (쿠담)",
        stops: &[
            stop("1. KaDeWe 백화점", 52.5015, 13.3414, View, "유럽 최대 백화점"),
            stop("2. 쿠담 거리", 52.5028, 13.3323, Walk, "베를린의 샹젤리제 명품 거리"),
            stop("3. Bikini Berlin", 52.5055, 13.3370, View, "동물원이 보이는 독특한 쇼핑몰"),
            stop("4. C/O Berlin", 52.5065, 13.3325, View, "사진 예술 전문 미술관"),
            stop("5. Schwarzes Café", 52.5060, 13.3250, Food, "24시간 영업하는 예술가들의 아지트"),
            stop("6. Savignyplatz", 52.5060, 13.3220, Walk, "고풍스러운 서점과 카페 광장"),
        ],
    },
    Course {
        title: "🌙 Theme 6: 화려한 밤 (미테 & 야경)",
        stops: &[
            stop("1. TV타워", 52.5208, 13.4094, View, "베를린 가장 높은 곳에서 야경 감상"),
            stop("2. 로젠탈러 거리", 52.5270, 13.4020, Walk, "트렌디한 샵과 갤러리 골목"),
            stop("3. Clärchens Ballhaus", 52.5265, 13.3965, Food, "100년 넘은 무도회장에서 식사"),
            stop("4. House of Small Wonder", 52.5240, 13.3920, Food, "식물원 같은 인테리어의 브런치"),
            stop("5. Friedrichstadt-Palast", 52.5235, 13.3885, View, "라스베가스 스타일의 화려한 쇼"),
            stop("6. 브란덴부르크 문", 52.5163, 13.3777, Walk, "밤 조명이 켜진 랜드마크"),
        ],
    },
];

pub fn course(index: usize) -> Option<&'static Course> {
    COURSES.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_courses_of_six_stops() {
        assert_eq!(COURSES.len(), 6);
        assert!(COURSES.iter().all(|c| c.stops.len() == 6));
    }

    #[test]
    fn stops_are_inside_berlin() {
        for stop in COURSES.iter().flat_map(|c| c.stops) {
            assert!((52.3..52.7).contains(&stop.lat), "{}", stop.name);
            assert!((13.0..13.8).contains(&stop.lng), "{}", stop.name);
        }
    }

    #[test]
    fn out_of_range_course_is_none() {
        assert!(course(5).is_some());
        assert!(course(6).is_none());
    }
}
