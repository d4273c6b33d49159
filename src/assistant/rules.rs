use once_cell::sync::Lazy;

/// A keyword rule for one language family. Keywords are lower-case and are
/// matched as substrings of the lower-cased input.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub id: &'static str,
    pub language: &'static str,
    pub keywords: &'static [&'static str],
    /// A phrase that is guaranteed to reach this rule; quoted by [`GENERIC_HELP`].
    pub example: &'static str,
    pub reply: &'static str,
}

pub struct FallbackGroup {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

pub const GREETING: &str =
    "Hello! I am CyberShield AI. Ask me anything about phishing, malware, or online safety.";

// Order matters: the first rule with any keyword hit wins. The romanised
// Telugu and Kannada greetings contain "namaskar" and therefore resolve to
// Hindi; their other keywords and native-script forms still reach them.
pub static INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        id: "tamil",
        language: "Tamil",
        keywords: &["vanakkam", "vanakam", "eppadi", "tamil", "வணக்கம்"],
        example: "Vanakkam",
        reply: "வணக்கம்! நான் CyberShield AI. தெரியாத இணைப்புகளை கிளிக் செய்யாதீர்கள், உங்கள் OTP-ஐ யாரிடமும் பகிர வேண்டாம். மோசடி நடந்தால் உடனே **1930** என்ற எண்ணை அழைக்கவும்.",
    },
    IntentRule {
        id: "hindi",
        language: "Hindi",
        keywords: &["namaste", "namaskar", "kaise", "madad", "hindi", "नमस्ते"],
        example: "Namaste",
        reply: "नमस्ते! मैं CyberShield AI हूँ। किसी को भी अपना OTP, PIN या CVV न बताएं। धोखाधड़ी होने पर तुरंत **1930** पर कॉल करें या cybercrime.gov.in पर शिकायत दर्ज करें।",
    },
    IntentRule {
        id: "telugu",
        language: "Telugu",
        keywords: &["namaskaram", "ela unnaru", "telugu", "నమస్కారం"],
        example: "Ela unnaru",
        reply: "నమస్కారం! నేను CyberShield AI. అనుమానాస్పద లింక్‌లను క్లిక్ చేయవద్దు, మీ OTP ఎవరికీ చెప్పవద్దు. మోసం జరిగితే వెంటనే **1930** కి కాల్ చేయండి.",
    },
    IntentRule {
        id: "kannada",
        language: "Kannada",
        keywords: &["namaskara", "hegiddira", "kannada", "ನಮಸ್ಕಾರ"],
        example: "Hegiddira",
        reply: "ನಮಸ್ಕಾರ! ನಾನು CyberShield AI. ಅಪರಿಚಿತ ಲಿಂಕ್‌ಗಳನ್ನು ಕ್ಲಿಕ್ ಮಾಡಬೇಡಿ, ನಿಮ್ಮ OTP ಯಾರಿಗೂ ಹೇಳಬೇಡಿ. ವಂಚನೆ ಆದರೆ ತಕ್ಷಣ **1930** ಗೆ ಕರೆ ಮಾಡಿ.",
    },
    IntentRule {
        id: "malayalam",
        language: "Malayalam",
        keywords: &["sukhamano", "malayalam", "നമസ്കാരം"],
        example: "Sukhamano",
        reply: "നമസ്കാരം! ഞാൻ CyberShield AI. അപരിചിതമായ ലിങ്കുകളിൽ ക്ലിക്ക് ചെയ്യരുത്, നിങ്ങളുടെ OTP ആരുമായും പങ്കിടരുത്. തട്ടിപ്പ് നടന്നാൽ ഉടൻ **1930** ൽ വിളിക്കുക.",
    },
    IntentRule {
        id: "bengali",
        language: "Bengali",
        keywords: &["nomoskar", "kemon acho", "bangla", "bengali", "নমস্কার"],
        example: "Kemon acho",
        reply: "নমস্কার! আমি CyberShield AI। অচেনা লিঙ্কে ক্লিক করবেন না, কাউকে আপনার OTP বলবেন না। প্রতারণা হলে সঙ্গে সঙ্গে **1930** নম্বরে ফোন করুন।",
    },
];

pub static ENGLISH_FALLBACKS: &[FallbackGroup] = &[
    FallbackGroup {
        keywords: &["scan", "check", "demo"],
        reply: "To run a scan, open the **Scanner**, pick URL, TEXT or IMAGE, paste the link or message (or attach a screenshot) and start the scan. Every verdict comes with a confidence score and can be exported as a report.",
    },
    FallbackGroup {
        keywords: &["news", "fraud", "help"],
        reply: "**Latest scam alerts:** 1) 'Digital Arrest' calls: scammers pose as police on video calls, and police never video call. 2) Fake electricity bill SMS threatening a power cut tonight; verify with your board. 3) Part-time 'task' jobs on Telegram that ask for an investment. Lost money? Call **1930** within the golden hour.",
    },
    FallbackGroup {
        keywords: &["police", "number"],
        reply: "Call the National Cyber Crime Helpline **1930** (toll-free) or file a complaint at **www.cybercrime.gov.in**. Keep screenshots of the chat and payment as evidence and ask your bank to block your cards.",
    },
];

/// Built from [`INTENT_RULES`] so every language family is always listed.
pub static GENERIC_HELP: Lazy<String> = Lazy::new(|| {
    let languages = INTENT_RULES
        .iter()
        .map(|rule| format!("{} ('{}')", rule.language, rule.example))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "I am CyberShield AI. Ask me to **scan** something, for the latest **fraud** alerts, \
         or for the **police** helpline number. I also understand {languages}."
    )
});
