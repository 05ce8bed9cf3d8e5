// Built-in lexicons for the profanity filter.
//
// These are plain data: the matching algorithm in moderation_service never
// changes when entries are added or removed. English entries are matched as
// whole words; Chinese entries are matched as substrings and must be at
// least two characters, because single characters are frequently innocuous
// outside context.

pub const EN_WORDS: &[&str] = &[
    "fuck", "fucker", "fucking", "fucked", "fucks",
    "shit", "shitty", "shitting", "bullshit",
    "asshole", "arsehole",
    "bitch", "bitches",
    "bastard", "bastards",
    "damn", "damned", "dammit",
    "cunt", "cunts",
    "dick", "dicks",
    "piss", "pissed", "pissing",
    "whore", "whores",
    "slut", "sluts",
    "cock", "cocks",
    "nigger", "nigga", "niggers",
    "faggot", "fag", "faggots",
    "retard", "retarded", "retards",
    "stfu", "gtfo", "lmfao",
    "motherfucker", "motherfucking",
    "dickhead", "douchebag", "dumbass",
    "jackass", "dipshit", "twat",
    "wanker", "tosser", "bellend",
    "kys", "killyourself",
];

pub const CN_PHRASES: &[&str] = &[
    "他妈", "你妈", "操你", "草你", "日你", "干你",
    "妈逼", "傻逼", "煞笔", "沙比", "傻比",
    "牛逼", "装逼", "苦逼",
    "狗日", "王八蛋", "混蛋", "浑蛋",
    "贱人", "婊子", "荡妇", "臭婊",
    "脑残", "智障", "白痴", "废物",
    "去死", "找死", "该死", "他妈的",
    "滚蛋", "滚犊子",
    "尼玛", "泥马", "草泥马",
    "卧槽", "我靠", "我操",
    "狗屎", "放屁",
    "神经病", "变态",
    "垃圾", "人渣", "败类",
    "弱智", "低能",
    "妈的", "靠北", "干他",
];
