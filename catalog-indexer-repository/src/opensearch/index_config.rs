//! Search index settings and mappings.
//!
//! All three indexes share one analysis chain: a combined Russian+English
//! analyzer (`ru_en`) with lowercasing, stop-word removal and stemming for
//! both languages. Mappings are `dynamic: "strict"` so a document carrying
//! an undeclared field is rejected rather than silently mapped.

use serde_json::{json, Value};

/// Date format declared on every date field, matching the timestamp format
/// the documents serialize with.
const DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss.SSSSSS";

fn analysis_settings() -> Value {
    json!({
        "refresh_interval": "1s",
        "analysis": {
            "filter": {
                "english_stop": {
                    "type": "stop",
                    "stopwords": "_english_"
                },
                "english_stemmer": {
                    "type": "stemmer",
                    "language": "english"
                },
                "english_possessive_stemmer": {
                    "type": "stemmer",
                    "language": "possessive_english"
                },
                "russian_stop": {
                    "type": "stop",
                    "stopwords": "_russian_"
                },
                "russian_stemmer": {
                    "type": "stemmer",
                    "language": "russian"
                }
            },
            "analyzer": {
                "ru_en": {
                    "tokenizer": "standard",
                    "filter": [
                        "lowercase",
                        "english_stop",
                        "english_stemmer",
                        "english_possessive_stemmer",
                        "russian_stop",
                        "russian_stemmer"
                    ]
                }
            }
        }
    })
}

fn nested_refs(name_analyzer: &str) -> Value {
    json!({
        "type": "nested",
        "dynamic": "false",
        "properties": {
            "id": {
                "type": "keyword"
            },
            "name": {
                "type": "text",
                "analyzer": name_analyzer
            }
        }
    })
}

/// Settings and mappings for the movies index.
pub fn movies_index_settings() -> Value {
    json!({
        "settings": analysis_settings(),
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "title": {
                    "type": "text",
                    "analyzer": "ru_en",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "description": {
                    "type": "text",
                    "analyzer": "ru_en"
                },
                "imdb_rating": {
                    "type": "float"
                },
                "type": {
                    "type": "text",
                    "analyzer": "ru_en"
                },
                "created": {
                    "type": "date",
                    "format": DATE_FORMAT
                },
                "modified": {
                    "type": "date",
                    "format": DATE_FORMAT
                },
                "genres": nested_refs("ru_en"),
                "actors": nested_refs("ru_en"),
                "writers": nested_refs("ru_en"),
                "directors": nested_refs("ru_en")
            }
        }
    })
}

/// Settings and mappings for the genres index.
pub fn genres_index_settings() -> Value {
    json!({
        "settings": analysis_settings(),
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "text",
                    "analyzer": "ru_en",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "description": {
                    "type": "text",
                    "analyzer": "ru_en"
                },
                "created": {
                    "type": "date",
                    "format": DATE_FORMAT
                },
                "modified": {
                    "type": "date",
                    "format": DATE_FORMAT
                },
                "movie_ids": {
                    "type": "keyword"
                }
            }
        }
    })
}

/// Settings and mappings for the persons index.
pub fn persons_index_settings() -> Value {
    json!({
        "settings": analysis_settings(),
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "text",
                    "analyzer": "ru_en",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "created": {
                    "type": "date",
                    "format": DATE_FORMAT
                },
                "modified": {
                    "type": "date",
                    "format": DATE_FORMAT
                },
                "roles": {
                    "type": "keyword"
                },
                "movie_ids": {
                    "type": "keyword"
                }
            }
        }
    })
}
