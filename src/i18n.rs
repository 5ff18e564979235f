#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

pub const LABEL_KEYS: &[&str] = &[
    "work",
    "projects",
    "skills",
    "education",
    "volunteer",
    "publications",
    "languages",
    "interests",
    "references",
    "certificates",
    "awards",
    "present",
    "until",
];

impl Locale {
    /// Accepts `fr`, `FR`, `fr-FR`, `fr_CA`, ...; anything unknown is English.
    pub fn parse(s: &str) -> Self {
        let lang = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "fr" => Self::Fr,
            _ => Self::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Display string for a section key; unknown keys come back unchanged.
    pub fn label<'a>(self, key: &'a str) -> &'a str {
        let found = match self {
            Self::En => english(key),
            Self::Fr => french(key),
        };
        found.unwrap_or(key)
    }

    pub(crate) fn short_month(self, month0: usize) -> &'static str {
        const EN: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        const FR: [&str; 12] = [
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ];
        match self {
            Self::En => EN[month0 % 12],
            Self::Fr => FR[month0 % 12],
        }
    }

    pub(crate) fn long_month(self, month0: usize) -> &'static str {
        const EN: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        const FR: [&str; 12] = [
            "janvier",
            "février",
            "mars",
            "avril",
            "mai",
            "juin",
            "juillet",
            "août",
            "septembre",
            "octobre",
            "novembre",
            "décembre",
        ];
        match self {
            Self::En => EN[month0 % 12],
            Self::Fr => FR[month0 % 12],
        }
    }
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "work" => "Experience",
        "projects" => "Projects",
        "skills" => "Skills",
        "education" => "Education",
        "volunteer" => "Volunteer",
        "publications" => "Publications",
        "languages" => "Languages",
        "interests" => "Interests",
        "references" => "References",
        "certificates" => "Certificates",
        "awards" => "Awards",
        "present" => "Present",
        "until" => "Until",
        _ => return None,
    })
}

fn french(key: &str) -> Option<&'static str> {
    Some(match key {
        "work" => "Expérience",
        "projects" => "Projets",
        "skills" => "Compétences",
        "education" => "Formation",
        "volunteer" => "Bénévolat",
        "publications" => "Publications",
        "languages" => "Langues",
        "interests" => "Centres d'intérêt",
        "references" => "Références",
        "certificates" => "Certificats",
        "awards" => "Distinctions",
        "present" => "Actuellement",
        "until" => "Jusqu'à",
        _ => return None,
    })
}
