//! Static word lists for the local filter. All entries are lowercase and
//! already stripped of diacritics, since they are compared against
//! normalized text.

/// Insults, slurs, defamatory accusations and spam phrases. Matched as
/// plain substrings, so a term hidden inside a longer word still hits.
pub const BLOCKLIST: &[&str] = &[
    // insults
    "idiota",
    "estupido",
    "imbecil",
    "pendejo",
    "pendeja",
    "tarado",
    "tarada",
    "retrasado",
    "mongolico",
    "baboso",
    "babosa",
    "cretino",
    "subnormal",
    // profanity
    "mierda",
    "puta",
    "puto",
    "cabron",
    "carajo",
    "maldito",
    "maldita",
    "hijo de puta",
    "hijueputa",
    "mamaguevo",
    "mamaguebo",
    "singao",
    "singa",
    "maricon",
    "cuero",
    // defamatory accusations
    "ladron",
    "ladrona",
    "corrupto",
    "corrupta",
    "acosador",
    "acosadora",
    "violador",
    "pervertido",
    "pervertida",
    "pedofilo",
    "drogadicto",
    "borracho",
    "vende notas",
    "vende las notas",
    // threats
    "te voy a matar",
    "lo voy a matar",
    "la voy a matar",
    "ojala se muera",
    // spam
    "gana dinero",
    "dinero facil",
    "haz clic",
    "compra ahora",
    "visita mi perfil",
    "http://",
    "https://",
    "www.",
];

/// Words that refer to the professor by title.
pub const TITLE_TOKENS: &[&str] = &[
    "profesor", "profesora", "profe", "dr", "dra", "ing", "lic", "licda", "maestro", "maestra",
];

/// Generic negative adjectives that carry no academic substance on their
/// own.
pub const NEGATIVE_TOKENS: &[&str] = &[
    "malo",
    "mala",
    "terrible",
    "pesimo",
    "pesima",
    "horrible",
    "incompetente",
    "inutil",
    "lo peor",
];
