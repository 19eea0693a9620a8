//! Localized reply texts.

use digest::Language;

/// A reply email, before addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub subject: String,
    pub body: String,
}

impl Reply {
    /// Build a reply, appending the usage footer for `language`.
    pub fn new(language: Language, subject: impl Into<String>, body: impl AsRef<str>) -> Self {
        let strings = strings(language);
        Self {
            subject: subject.into(),
            body: format!("{}\n\n--\n{}", body.as_ref().trim_end(), strings.footer),
        }
    }

    /// Generic failure reply for a command that could not be applied.
    pub fn error(language: Language) -> Self {
        let strings = strings(language);
        Self::new(language, strings.error_subject, strings.error)
    }
}

/// Fixed reply strings for one language.
///
/// `{location}`, `{name}`, `{date}`, `{mode}`, `{lang}` and `{count}` are
/// substituted by the dispatcher.
#[derive(Debug)]
pub struct ReplyStrings {
    pub subscribed_subject: &'static str,
    pub subscribed: &'static str,
    pub preview_header: &'static str,
    pub preview_unavailable: &'static str,
    pub not_found_subject: &'static str,
    pub not_found: &'static str,
    pub try_later_subject: &'static str,
    pub try_later: &'static str,
    pub unsubscribed_subject: &'static str,
    pub unsubscribed: &'static str,
    pub subscribe_first_subject: &'static str,
    pub subscribe_first: &'static str,
    pub settings_subject: &'static str,
    pub personality_set: &'static str,
    pub language_set: &'static str,
    pub sample_header: &'static str,
    pub countdown_subject: &'static str,
    pub countdown_saved: &'static str,
    pub countdown_yearly: &'static str,
    pub countdowns_cleared_subject: &'static str,
    pub countdowns_cleared: &'static str,
    pub help_subject: &'static str,
    pub help: &'static str,
    pub error_subject: &'static str,
    pub error: &'static str,
    pub footer: &'static str,
}

pub fn strings(language: Language) -> &'static ReplyStrings {
    match language {
        Language::En => &EN,
        Language::Es => &ES,
        Language::Sk => &SK,
    }
}

static EN: ReplyStrings = ReplyStrings {
    subscribed_subject: "Subscribed: {location}",
    subscribed: "You will receive the daily weather for {location} every morning.",
    preview_header: "Here is today's preview:",
    preview_unavailable: "Today's forecast is not available right now. Your first digest arrives tomorrow morning.",
    not_found_subject: "Location not found",
    not_found: "We could not find \"{location}\". Try being more specific, for example \"Prague, CZ\".",
    try_later_subject: "Please try again later",
    try_later: "The weather service is not responding right now. Nothing was changed, please try again later.",
    unsubscribed_subject: "Unsubscribed",
    unsubscribed: "You will no longer receive the daily weather.",
    subscribe_first_subject: "Subscribe first",
    subscribe_first: "You are not subscribed yet. Send the name of your city first, then change the language or personality.",
    settings_subject: "Settings updated",
    personality_set: "Personality set to {mode}.",
    language_set: "Language set to {lang}.",
    sample_header: "Sample:",
    countdown_subject: "Countdown saved",
    countdown_saved: "Countdown \"{name}\" saved for {date}.",
    countdown_yearly: "It repeats every year.",
    countdowns_cleared_subject: "Countdowns deleted",
    countdowns_cleared: "Deleted countdowns: {count}.",
    help_subject: "How to use Daily Brief",
    help: "We could not understand your message.\n\n\
           Send one of these:\n\
           • a city, e.g. \"Prague\" or \"Prague, CZ\"\n\
           • a city with options, e.g. \"Bratislava sk cute\"\n\
           • a language: en, es, sk\n\
           • a personality: neutral, cute, brutal\n\
           • a countdown:\n  date=2025-12-01\n  time=08:30\n  message=Doctor\n\
           • \"delete countdowns\" to remove all countdowns\n\
           • \"delete\" to unsubscribe",
    error_subject: "Something went wrong",
    error: "We could not process your message. Nothing was changed, please try again later.",
    footer: "Reply with a city to change location, en/es/sk for language, neutral/cute/brutal for tone, or \"delete\" to unsubscribe.",
};

static ES: ReplyStrings = ReplyStrings {
    subscribed_subject: "Suscrito: {location}",
    subscribed: "Recibirás el tiempo de {location} cada mañana.",
    preview_header: "Esta es la vista previa de hoy:",
    preview_unavailable: "El pronóstico de hoy no está disponible ahora. Tu primer resumen llegará mañana por la mañana.",
    not_found_subject: "Ubicación no encontrada",
    not_found: "No encontramos \"{location}\". Intenta ser más específico, por ejemplo \"Madrid, ES\".",
    try_later_subject: "Inténtalo más tarde",
    try_later: "El servicio del tiempo no responde ahora. No se cambió nada, inténtalo más tarde.",
    unsubscribed_subject: "Suscripción cancelada",
    unsubscribed: "Ya no recibirás el tiempo diario.",
    subscribe_first_subject: "Suscríbete primero",
    subscribe_first: "Aún no estás suscrito. Envía primero el nombre de tu ciudad y luego cambia el idioma o la personalidad.",
    settings_subject: "Ajustes actualizados",
    personality_set: "Personalidad cambiada a {mode}.",
    language_set: "Idioma cambiado a {lang}.",
    sample_header: "Ejemplo:",
    countdown_subject: "Cuenta atrás guardada",
    countdown_saved: "Cuenta atrás \"{name}\" guardada para el {date}.",
    countdown_yearly: "Se repite cada año.",
    countdowns_cleared_subject: "Cuentas atrás eliminadas",
    countdowns_cleared: "Cuentas atrás eliminadas: {count}.",
    help_subject: "Cómo usar Daily Brief",
    help: "No entendimos tu mensaje.\n\n\
           Envía uno de estos:\n\
           • una ciudad, p. ej. \"Madrid\" o \"Madrid, ES\"\n\
           • una ciudad con opciones, p. ej. \"Lima es brutal\"\n\
           • un idioma: en, es, sk\n\
           • una personalidad: neutral, cute, brutal\n\
           • una cuenta atrás:\n  date=2025-12-01\n  time=08:30\n  message=Médico\n\
           • \"delete countdowns\" para borrar las cuentas atrás\n\
           • \"delete\" para cancelar la suscripción",
    error_subject: "Algo salió mal",
    error: "No pudimos procesar tu mensaje. No se cambió nada, inténtalo más tarde.",
    footer: "Responde con una ciudad para cambiar la ubicación, en/es/sk para el idioma, neutral/cute/brutal para el tono, o \"delete\" para darte de baja.",
};

static SK: ReplyStrings = ReplyStrings {
    subscribed_subject: "Prihlásené: {location}",
    subscribed: "Každé ráno ti pošleme počasie pre {location}.",
    preview_header: "Tu je dnešná ukážka:",
    preview_unavailable: "Dnešná predpoveď momentálne nie je dostupná. Prvý prehľad príde zajtra ráno.",
    not_found_subject: "Miesto sa nenašlo",
    not_found: "Nenašli sme \"{location}\". Skús byť presnejší, napríklad \"Bratislava, SK\".",
    try_later_subject: "Skús to neskôr",
    try_later: "Služba počasia momentálne neodpovedá. Nič sa nezmenilo, skús to neskôr.",
    unsubscribed_subject: "Odhlásené",
    unsubscribed: "Denné počasie ti už nebudeme posielať.",
    subscribe_first_subject: "Najprv sa prihlás",
    subscribe_first: "Ešte nie si prihlásený. Najprv pošli názov svojho mesta, potom môžeš zmeniť jazyk alebo osobnosť.",
    settings_subject: "Nastavenia zmenené",
    personality_set: "Osobnosť nastavená na {mode}.",
    language_set: "Jazyk nastavený na {lang}.",
    sample_header: "Ukážka:",
    countdown_subject: "Odpočítavanie uložené",
    countdown_saved: "Odpočítavanie \"{name}\" uložené na {date}.",
    countdown_yearly: "Opakuje sa každý rok.",
    countdowns_cleared_subject: "Odpočítavania zmazané",
    countdowns_cleared: "Zmazané odpočítavania: {count}.",
    help_subject: "Ako používať Daily Brief",
    help: "Tvojej správe sme nerozumeli.\n\n\
           Pošli jedno z tohto:\n\
           • mesto, napr. \"Bratislava\" alebo \"Bratislava, SK\"\n\
           • mesto s možnosťami, napr. \"Bratislava sk cute\"\n\
           • jazyk: en, es, sk\n\
           • osobnosť: neutral, cute, brutal, emuska\n\
           • odpočítavanie:\n  date=2025-12-01\n  time=08:30\n  message=Lekár\n\
           • \"delete countdowns\" na zmazanie odpočítavaní\n\
           • \"delete\" na odhlásenie",
    error_subject: "Niečo sa pokazilo",
    error: "Tvoju správu sa nepodarilo spracovať. Nič sa nezmenilo, skús to neskôr.",
    footer: "Odpovedz názvom mesta pre zmenu miesta, en/es/sk pre jazyk, neutral/cute/brutal/emuska pre tón, alebo \"delete\" pre odhlásenie.",
};
