use super::PromptFamily;

pub fn template(family: PromptFamily) -> &'static str {
    match family {
        PromptFamily::Easy => EASY,
        PromptFamily::Medium => MEDIUM,
        PromptFamily::Hard => HARD,
        PromptFamily::Mixed => MIXED,
        PromptFamily::AnswerAndChunks => ANSWER_AND_CHUNKS,
        PromptFamily::Hierarchical => HIERARCHICAL,
        PromptFamily::CrossPage => CROSS_PAGE,
        PromptFamily::LongEasy => LONG_EASY,
        PromptFamily::LongMedium => LONG_MEDIUM,
        PromptFamily::LongHard => LONG_HARD,
        PromptFamily::LongMixed => LONG_MIXED,
    }
}

const EASY: &str = "\
Du liest eine kurze interne Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine einfache, faktenbasierte Frage, die ein neues Teammitglied \
allein durch Lesen der obigen Seite beantworten könnte. Gib nur die Frage \
zurück.";

const MEDIUM: &str = "\
Du liest eine Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine mittelschwere Frage, die das Verknüpfen von mindestens zwei \
Details aus der obigen Seite erfordert. Gib nur die Frage zurück.";

const HARD: &str = "\
Du liest eine Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine schwere Frage, die das Zusammenführen mehrerer Abschnitte \
der obigen Seite erfordert und nicht durch ein einzelnes Zitat beantwortet \
werden kann. Gib nur die Frage zurück.";

const MIXED: &str = "\
Du liest eine Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine Frage zur obigen Seite. Variiere den Schwierigkeitsgrad \
natürlich; erkläre deine Wahl nicht. Gib nur die Frage zurück.";

const ANSWER_AND_CHUNKS: &str = "\
Du liest eine Wiki-Seite mit dem Titel \"{title}\".

{content}

Beantworte die folgende Frage ausschließlich anhand der obigen Seite:

{question}

Gib die Antwort zurück sowie die genauen Sätze oder Passagen der Seite, die \
sie belegen.";

const HIERARCHICAL: &str = "\
Du liest eine Wiki-Seite mit dem Titel \"{title}\", Teil dieses \
Wiki-Abschnitts:

{hierarchy_context}

{content}

Formuliere eine Frage zur obigen Seite, die ein Leser stellen würde, der den \
umgebenden Abschnitt bereits kennt. Gib nur die Frage zurück.";

const CROSS_PAGE: &str = "\
Du liest mehrere zusammenhängende Wiki-Seiten:

{combined_content}

Formuliere eine Frage, deren Antwort Informationen aus mehr als einer der \
obigen Seiten erfordert. Gib nur die Frage zurück.";

const LONG_EASY: &str = "\
Du liest eine lange interne Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine einfache, faktenbasierte Frage, die ein neues Teammitglied \
allein durch Lesen der obigen Seite beantworten könnte. Gib nur die Frage \
zurück.";

const LONG_MEDIUM: &str = "\
Du liest eine lange Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine mittelschwere Frage, die das Verknüpfen von Details \
erfordert, die über die gesamte obige Seite verteilt sind. Gib nur die \
Frage zurück.";

const LONG_HARD: &str = "\
Du liest eine lange Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine schwere Frage, die das Zusammenführen weit auseinander \
liegender Abschnitte der obigen Seite erfordert und nicht durch ein \
einzelnes Zitat beantwortet werden kann. Gib nur die Frage zurück.";

const LONG_MIXED: &str = "\
Du liest eine lange Wiki-Seite mit dem Titel \"{title}\".

{content}

Formuliere eine Frage zur obigen Seite. Variiere den Schwierigkeitsgrad \
natürlich; erkläre deine Wahl nicht. Gib nur die Frage zurück.";
