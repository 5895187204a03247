//! Client-side scripts embedded in the page

/// Keyboard and button navigation plus zoom-to-fit
///
/// Presentation decks show one `.aksara-page.active` at a time; documents
/// scroll to the selected page. `+`/`-` zoom, `0` fits the page to the
/// window. The current page is kept in `location.hash` as `#page-N`.
pub const NAV_SCRIPT: &str = r#"(function () {
  var body = document.body;
  var deck = document.querySelector('.aksara-deck');
  var pages = Array.prototype.slice.call(document.querySelectorAll('.aksara-page'));
  var counter = document.querySelector('.aksara-counter');
  var slides = body.classList.contains('aksara-presentation');
  var current = 0;
  var zoom = 1;
  if (!deck || pages.length === 0) { return; }

  function fitScale() {
    var page = pages[current];
    var w = page.offsetWidth || 1;
    var h = page.offsetHeight || 1;
    var sx = (window.innerWidth - 32) / w;
    return slides ? Math.min(sx, (window.innerHeight - 32) / h) : Math.min(1, sx);
  }

  function applyZoom() {
    deck.style.transform = 'scale(' + zoom + ')';
  }

  function show(index) {
    current = Math.max(0, Math.min(pages.length - 1, index));
    pages.forEach(function (page, i) { page.classList.toggle('active', i === current); });
    if (!slides) { pages[current].scrollIntoView({ block: 'start' }); }
    if (counter) { counter.textContent = (current + 1) + ' / ' + pages.length; }
    if (history.replaceState) { history.replaceState(null, '', '#page-' + (current + 1)); }
  }

  function act(action) {
    switch (action) {
      case 'prev': show(current - 1); break;
      case 'next': show(current + 1); break;
      case 'first': show(0); break;
      case 'last': show(pages.length - 1); break;
      case 'zoom-in': zoom = Math.min(4, zoom * 1.1); applyZoom(); break;
      case 'zoom-out': zoom = Math.max(0.2, zoom / 1.1); applyZoom(); break;
      case 'fit': zoom = fitScale(); applyZoom(); break;
    }
  }

  document.addEventListener('keydown', function (e) {
    var keys = {
      ArrowRight: 'next', ArrowDown: 'next', PageDown: 'next', ' ': 'next',
      ArrowLeft: 'prev', ArrowUp: 'prev', PageUp: 'prev',
      Home: 'first', End: 'last', '+': 'zoom-in', '=': 'zoom-in', '-': 'zoom-out', '0': 'fit'
    };
    var action = keys[e.key];
    if (!action || (!slides && /^Arrow(Up|Down)$/.test(e.key))) { return; }
    e.preventDefault();
    act(action);
  });

  document.querySelectorAll('.aksara-controls [data-action]').forEach(function (button) {
    button.addEventListener('click', function () { act(button.getAttribute('data-action')); });
  });

  window.addEventListener('resize', function () { if (slides) { act('fit'); } });

  var match = /^#page-(\d+)$/.exec(location.hash);
  show(match ? parseInt(match[1], 10) - 1 : 0);
  if (slides) { act('fit'); }
})();"#;

/// Diagram renderer loaded when a page contains a `mermaid` block
pub const MERMAID_SRC: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

/// Starts the diagram renderer and flags completion on `<body>`
///
/// The PDF backend polls for `data-diagrams="done"` before printing.
pub const MERMAID_INIT: &str = r#"(function () {
  if (!window.mermaid) { document.body.setAttribute('data-diagrams', 'done'); return; }
  mermaid.initialize({ startOnLoad: false });
  mermaid.run({ querySelector: '.mermaid' }).then(
    function () { document.body.setAttribute('data-diagrams', 'done'); },
    function () { document.body.setAttribute('data-diagrams', 'done'); }
  );
})();"#;
