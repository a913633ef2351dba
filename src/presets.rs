/// A named bundle of habits that can seed a sheet's habit list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Preset {
    pub(crate) id: &'static str,
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) icon: &'static str,
    pub(crate) habits: &'static [&'static str],
    /// Accent color name used when rendering the preset in color
    pub(crate) color: &'static str,
}

impl Preset {
    /// Returns an owned copy of the preset's habits
    pub(crate) fn habit_list(&self) -> Vec<String> {
        self.habits.iter().map(|&h| String::from(h)).collect()
    }
}

pub(crate) static PRESETS: [Preset; 4] = [
    Preset {
        id: "academic",
        name: "学霸养成",
        description: "侧重学习习惯",
        icon: "📚",
        habits: &["每日阅读30分钟", "完成当日作业", "练字10分钟", "预习明日课程"],
        color: "blue",
    },
    Preset {
        id: "health",
        name: "健康活力",
        description: "侧重身体健康",
        icon: "🏃",
        habits: &["运动30分钟", "早睡早起", "户外活动1小时", "眼保健操"],
        color: "green",
    },
    Preset {
        id: "balanced",
        name: "全面发展",
        description: "学习生活平衡",
        icon: "🎨",
        habits: &["阅读30分钟", "运动30分钟", "做一件家务", "兴趣爱好练习"],
        color: "purple",
    },
    Preset {
        id: "custom",
        name: "自定义",
        description: "由你自由发挥",
        icon: "⚡",
        habits: &[],
        color: "gray",
    },
];

const DEFAULT_PRESET: usize = 2;

pub(crate) fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

pub(crate) fn default_preset() -> &'static Preset {
    &PRESETS[DEFAULT_PRESET]
}
